// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Result caching shared across extraction requests.

pub mod cache;
