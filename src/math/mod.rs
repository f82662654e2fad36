pub mod percent;
