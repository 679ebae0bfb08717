//! Typed identifiers for the catalog.

use catalog_core::uuid_newtype;

uuid_newtype!(pub ProductId, "ProductId");
uuid_newtype!(pub VariantId, "VariantId");
uuid_newtype!(pub ReviewId, "ReviewId");
uuid_newtype!(
    /// Identifier of the customer who wrote a review.
    pub ReviewerId,
    "ReviewerId"
);
uuid_newtype!(pub InventoryItemId, "InventoryItemId");
uuid_newtype!(pub BrandId, "BrandId");
uuid_newtype!(pub CategoryId, "CategoryId");
