pub mod headline;
