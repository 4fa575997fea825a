use crate::{geometry::GeometryError, loader::LoaderError, radial::ProfileError};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `loader` module")]
    Loader(#[from] LoaderError),
    #[error("Error in the `geometry` module")]
    Geometry(#[from] GeometryError),
    #[error("Error in the `radial` module")]
    Profile(#[from] ProfileError),
    #[error("Failed to write the summary CSV file")]
    Csv(#[from] csv::Error),
}
