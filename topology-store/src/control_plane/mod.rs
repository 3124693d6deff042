//! Control-plane layer.
//!
//! Owns the authoritative topology tree and its scoped CRUD surface. Every mutation
//! runs the same pipeline under the exclusive lock:
//!
//! 1. clone the committed tree into a staged copy and apply the candidate to it;
//! 2. normalize names, parents and references, then validate the whole staged tree;
//! 3. diff the touched subtree or leaf between committed and staged trees;
//! 4. unless dry-run, assign identities, rebuild derived connections and swap the
//!    staged tree in.
//!
//! A failure at any step leaves the committed tree untouched.
//!
//! ```
//! use tokio_util::sync::CancellationToken;
//! use topology_store::meta::{App, Channel, ChannelType};
//! use topology_store::{ChangeKind, TopologyStore};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let store = TopologyStore::new();
//! let cancel = CancellationToken::new();
//!
//! let billing = App::named("billing")
//!     .with_type(ChannelType::new("Invoice", "{}"))
//!     .with_channel(Channel::new("invoices", "Invoice"));
//! let preview = store.apps().create(&cancel, "", billing.clone(), true).await.unwrap();
//! assert!(store.apps().get(&cancel, "billing").await.is_err());
//!
//! let changelog = store.apps().create(&cancel, "", billing, false).await.unwrap();
//! assert_eq!(preview, changelog);
//! assert_eq!(changelog.changes()[0].kind, ChangeKind::AppCreated);
//! # });
//! ```

pub(crate) mod alias_memory;
pub(crate) mod app_memory;
pub(crate) mod channel_memory;
pub(crate) mod staging;
pub(crate) mod topology_store;
pub(crate) mod type_memory;
pub(crate) mod validation;

pub use alias_memory::AliasMemory;
pub use app_memory::AppMemory;
pub use channel_memory::ChannelMemory;
pub use topology_store::TopologyStore;
pub use type_memory::TypeMemory;
