// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! Natural-language chat over the task store

pub mod engine;

pub use engine::ChatEngine;
