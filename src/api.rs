pub mod catalog;
pub mod error;
pub mod graphql;
pub mod mylist;
pub mod playback;
pub mod session;
pub mod transport;

pub use error::{Result, TeliaError};
pub use session::{TeliaSession, TokenData, UserData};
pub use transport::{HttpTransport, Method, Request, Response, Transport};
