//! Base trait for API resources
//!
//! A resource groups the endpoints of one API area (users, projects, ...)
//! and holds a cloned [`ApiClient`] handle. Everything else is provided.
//!
//! ```rust
//! use nexical::{ApiClient, Method, RequestOptions, Resource, Result};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize)]
//! struct UserFilters {
//!     role: Option<String>,
//!     tags: Vec<String>,
//! }
//!
//! #[derive(Deserialize)]
//! struct User {
//!     id: String,
//! }
//!
//! #[derive(Clone)]
//! struct Users {
//!     client: ApiClient,
//! }
//!
//! impl Resource for Users {
//!     fn client(&self) -> &ApiClient {
//!         &self.client
//!     }
//! }
//!
//! impl Users {
//!     async fn list(&self, filters: &UserFilters) -> Result<Vec<User>> {
//!         let path = self.with_query("/users", filters)?;
//!         self.request(Method::GET, &path, None, RequestOptions::default())
//!             .await
//!     }
//! }
//! ```

use async_trait::async_trait;
use http::Method;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::{
    client::{ApiClient, Body, RequestOptions},
    error::Result,
};

/// Base trait for API resources.
#[async_trait]
pub trait Resource: Send + Sync {
    /// Get a reference to the client.
    fn client(&self) -> &ApiClient;

    /// Send a request through the client unchanged.
    ///
    /// See [`ApiClient::request`] for header, body and response handling.
    async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Body<'_>>,
        options: RequestOptions,
    ) -> Result<T>
    where
        T: DeserializeOwned + Send,
    {
        self.client().request(method, path, body, options).await
    }

    /// Build a `?`-prefixed query string from filters, or `""` when nothing remains.
    fn build_query<F>(&self, filters: &F) -> Result<String>
    where
        F: Serialize + ?Sized,
    {
        Ok(nexical_core::query::build_query(filters)?)
    }

    /// Append the query string for `filters` to `path`.
    fn with_query<F>(&self, path: &str, filters: &F) -> Result<String>
    where
        F: Serialize + ?Sized,
    {
        Ok(format!("{}{}", path, self.build_query(filters)?))
    }
}
