pub mod tokio_broadcast;
