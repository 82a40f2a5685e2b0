/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 3/9/24
******************************************************************************/

//! Client for the WADAS dashboard REST API.
//!
//! The crate is organised around [`application::client::RetryingSessionClient`],
//! which issues authenticated requests and, when the server answers with an
//! authorization failure, refreshes the access token once and retries the
//! request exactly once more.

pub mod config;

pub mod constants;

pub mod error;

pub mod application;

pub mod session;

pub mod storage;

pub mod transport;

pub mod utils;
