// UI module - headless interaction layer
//
// This module contains:
// - AppController: Owns the render session, export pipeline and download
//   gate, and exposes every designer interaction as a method

pub mod controller;

pub use controller::{AppController, CatalogIcon};
