use thiserror::Error;

pub type Result<T = ()> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Sql error")]
    SqlError(#[from] sqlx::Error),
    #[error("invalid database url: {0}")]
    InvalidUrl(String),
}
