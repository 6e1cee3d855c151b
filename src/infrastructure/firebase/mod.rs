//! Firebase REST adapters: identity toolkit and Firestore.

mod auth_client;
mod dto;
mod firestore_client;

use std::time::Duration;

use reqwest::Client;

pub use auth_client::FirebaseAuthClient;
pub use firestore_client::{FirestoreClient, FirestoreConfig};

pub(crate) const USER_AGENT: &str = concat!("campusdesk/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

fn http_client() -> reqwest::Result<Client> {
    Client::builder().timeout(REQUEST_TIMEOUT).build()
}
