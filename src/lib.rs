//! Daily CanvasData 2 CSV importer: finds the part files the warehouse
//! extract dropped for a dataset, normalizes them into one row batch, and
//! upserts the rows into the matching PostgreSQL table.

pub mod batch;
pub mod config;
pub mod dataset;
pub mod db;
pub mod discover;
pub mod import;
