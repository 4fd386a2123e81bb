//! Test support for repository integration tests.

mod context;

pub(crate) use context::{PhotoFixture, TestContext};
