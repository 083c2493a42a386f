use super::domain::{ClientId, ClientRecord, ProductId, ProductRecord};

/// Lookup surface for registered shoppers. The rating service only ever asks
/// whether a client exists; registration exists so deployments without an
/// upstream identity feed can still populate the directory.
pub trait ClientDirectory: Send + Sync {
    fn register(&self, record: ClientRecord) -> Result<ClientRecord, DirectoryError>;
    fn fetch(&self, id: &ClientId) -> Result<Option<ClientRecord>, DirectoryError>;
    fn contains(&self, id: &ClientId) -> Result<bool, DirectoryError>;
}

/// Lookup surface for listed products.
pub trait ProductCatalog: Send + Sync {
    fn register(&self, record: ProductRecord) -> Result<ProductRecord, DirectoryError>;
    fn fetch(&self, id: &ProductId) -> Result<Option<ProductRecord>, DirectoryError>;
    fn contains(&self, id: &ProductId) -> Result<bool, DirectoryError>;
    fn list(&self) -> Result<Vec<ProductRecord>, DirectoryError>;
}

/// Error enumeration for directory failures.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("record already exists")]
    Conflict,
    #[error("directory unavailable: {0}")]
    Unavailable(String),
}
