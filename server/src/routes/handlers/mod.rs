pub mod rfq;
