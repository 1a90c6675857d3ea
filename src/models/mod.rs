// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Data model: focus points and editor configuration.

pub mod config;
pub mod focuspoint;
