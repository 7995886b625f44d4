//! Shared test harness modules for the shelter-gap CLI.
#![expect(
    clippy::panic,
    reason = "Tests assert panic branches to surface unexpected CLI outcomes"
)]

use super::*;
use crate::analyse::*;

mod helpers;
