pub mod export;

pub mod filters;

pub mod logger;

pub mod pagination;
