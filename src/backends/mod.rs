// SPDX-License-Identifier: GPL-3.0-only

//! Backend abstraction layer for depth acquisition
//!
//! The tracker never talks to hardware directly. Everything that produces
//! depth frames implements [`depth::DepthSource`], and everything that
//! cleans them up before classification implements [`depth::NoiseFilter`]:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │              DepthPipeline                   │
//! └──────────┬───────────────────────┬───────────┘
//!            │                       │
//!            ▼                       ▼
//! ┌────────────────────┐   ┌──────────────────────┐
//! │   DepthSource      │   │    NoiseFilter       │
//! │  Playback (tests)  │   │  Passthrough / Range │
//! │  Recording (file)  │   └──────────────────────┘
//! └────────────────────┘
//! ```

pub mod depth;
