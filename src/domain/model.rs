// ドメインモデル（エンティティと値オブジェクト）

mod value_objects;
mod product;
mod stock_batch;
mod sale;

pub use value_objects::{
    ProductId, BatchId, SaleId, CustomerId,
    Money,
    SaleItem,
    BatchAllocation,
};

pub use product::Product;
pub use stock_batch::StockBatch;
pub use sale::Sale;
