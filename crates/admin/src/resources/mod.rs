//! Resource access modules, one per entity.
//!
//! Each module bundles the entity's filtered/paginated query, its
//! mutations, and its media cascade behind a borrowed handle constructed by
//! [`crate::SidraData`]. Reads go through the shared [`crate::cache::QueryCache`];
//! mutations invalidate the entity's list family and overwrite the detail
//! entry with the returned row.

pub mod banners;
pub mod blog;
pub mod branches;
pub mod categories;
pub mod combos;
pub mod galleries;
pub mod orders;
pub mod products;
pub mod testimonials;
pub mod users;

pub use banners::{Banners, CreateBanner, UpdateBanner};
pub use blog::{Blog, BlogFilters, CreatePost, UpdatePost};
pub use branches::{Branches, CreateBranch, UpdateBranch};
pub use categories::{Categories, CreateCategory, UpdateCategory};
pub use combos::{ComboFilters, Combos, CreateCombo, UpdateCombo};
pub use galleries::{CreateGalleryImage, Galleries, UpdateGalleryImage};
pub use orders::{CreateOrder, NewOrderItem, OrderFilters, Orders};
pub use products::{CreateProduct, ProductFilters, Products, UpdateProduct};
pub use testimonials::{CreateTestimonial, TestimonialFilters, Testimonials, UpdateTestimonial};
pub use users::{UpdateProfile, UserFilters, Users};
