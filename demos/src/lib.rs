// Copyright 2025 the Overstory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runnable demos for the Overstory crates.
//!
//! See the `examples/` directory; each example narrates one integration
//! scenario on stdout.
