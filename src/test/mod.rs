//! Shared test harness: an in-process stub backend plus services wired
//! against it.

mod stub_api;

pub(crate) use context::TestContext;
