//! Domain building blocks shared by the scan2cad services: job
//! bookkeeping, the simulated stage runner, upload decoding and the
//! data directory layout.

pub mod data_url;
pub mod dimensions;
pub mod error;
pub mod images;
pub mod jobs;
pub mod pipeline;
pub mod storage;
pub mod types;
