//! Company list view: query state, row projection, columns and actions.

pub mod actions;
pub mod columns;
pub mod projector;
pub mod state;
pub mod view;
