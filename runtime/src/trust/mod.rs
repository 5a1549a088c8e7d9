// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Secrets the engine needs to reach authenticated pages.

pub mod credentials;
