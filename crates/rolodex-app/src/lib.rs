// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod collection;
pub mod coordinator;
pub mod detail;
pub mod error;
pub mod forms;
pub mod ids;
pub mod ledger;
pub mod messages;
pub mod model;
pub mod sorting;
pub mod state;
pub mod texts;

#[cfg(test)]
mod testing;

pub use collection::*;
pub use coordinator::{Coordinator, CoordinatorSettings};
pub use error::RemoteError;
pub use ids::*;
pub use model::*;
pub use state::*;
pub use texts::{TextCatalog, TextKey};
