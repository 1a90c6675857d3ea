// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Focus point editor.
//!
//! Lets an editor mark rectangular focus areas on an image so cropping can
//! keep the important region. The editor core lives in [`wizard`]; [`app`]
//! and [`ui`] host it in an egui window.

pub mod app;
pub mod error;
pub mod io;
pub mod models;
pub mod ui;
pub mod util;
pub mod wizard;
