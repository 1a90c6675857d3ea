// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components of the editor dialog.

pub mod canvas;
pub mod panels;
pub mod toolbar;
