//! Composition of resources into a typed SDK client
//!
//! A registry is a plain struct of resources built once from an
//! [`ApiClient`]. [`SdkClient`] pairs the two, so `sdk.users.list(..)` and
//! `sdk.api().get(..)` share one client.
//!
//! ```rust
//! use nexical::{ApiClient, Resource, SdkClient, resource_registry};
//!
//! #[derive(Clone)]
//! pub struct Users {
//!     client: ApiClient,
//! }
//!
//! impl Resource for Users {
//!     fn client(&self) -> &ApiClient {
//!         &self.client
//!     }
//! }
//!
//! impl From<ApiClient> for Users {
//!     fn from(client: ApiClient) -> Self {
//!         Self { client }
//!     }
//! }
//!
//! resource_registry! {
//!     pub struct Registry {
//!         pub users: Users,
//!     }
//! }
//!
//! let sdk: SdkClient<Registry> = SdkClient::from_api_client(
//!     ApiClient::new("https://api.nexical.com").unwrap(),
//! );
//! assert_eq!(sdk.users.client().base_url(), "https://api.nexical.com");
//! ```

use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use crate::{client::ApiClient, config::ClientConfig, error::Result};

/// A set of resources built from a shared client.
pub trait ResourceRegistry: Sized + Send + Sync {
    /// Build every resource from the client.
    fn initialize(client: &ApiClient) -> Self;
}

/// The empty registry: an SDK client with raw request access only.
impl ResourceRegistry for () {
    fn initialize(_client: &ApiClient) -> Self {}
}

/// Declare a registry struct whose fields are built with `From<ApiClient>`.
///
/// Every field type must implement `From<ApiClient>`.
#[macro_export]
macro_rules! resource_registry {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::ResourceRegistry for $name {
            fn initialize(client: &$crate::ApiClient) -> Self {
                Self {
                    $($field: <$ty as ::std::convert::From<$crate::ApiClient>>::from(client.clone()),)*
                }
            }
        }
    };
}

/// An [`ApiClient`] paired with a registry of resources.
///
/// Derefs to the registry. Clones share both the client and the registry.
pub struct SdkClient<R> {
    api: ApiClient,
    resources: Arc<R>,
}

impl<R: ResourceRegistry> SdkClient<R> {
    /// Build the client and its resources from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the transport cannot be created.
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self::from_api_client(ApiClient::from_config(config)?))
    }

    /// Build the resources around an existing client.
    pub fn from_api_client(api: ApiClient) -> Self {
        let resources = Arc::new(R::initialize(&api));
        Self { api, resources }
    }
}

impl<R> SdkClient<R> {
    /// The underlying client, for endpoints without a resource.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// The resource registry.
    pub fn resources(&self) -> &R {
        &self.resources
    }
}

impl<R> Clone for SdkClient<R> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            resources: Arc::clone(&self.resources),
        }
    }
}

impl<R> Deref for SdkClient<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.resources
    }
}

impl<R> fmt::Debug for SdkClient<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SdkClient")
            .field("api", &self.api)
            .finish_non_exhaustive()
    }
}
