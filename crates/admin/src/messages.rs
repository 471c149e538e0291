//! User-facing Arabic messages.
//!
//! The dashboard is Arabic-first; every error that can reach a toast or an
//! empty-state view is one of these constants. Raw backend errors are logged
//! at the boundary and never shown to operators.

/// Backend unreachable or misconfigured.
pub const CONNECTIVITY: &str = "تعذر الاتصال بالخادم، يرجى المحاولة مرة أخرى لاحقاً";

// Products
pub const FETCH_PRODUCTS: &str = "فشل في جلب المنتجات";
pub const PRODUCT_NOT_FOUND: &str = "المنتج غير موجود";
pub const CREATE_PRODUCT: &str = "فشل في إضافة المنتج";
pub const UPDATE_PRODUCT: &str = "فشل في تحديث المنتج";
pub const DELETE_PRODUCT: &str = "فشل في حذف المنتج";

// Orders
pub const FETCH_ORDERS: &str = "فشل في جلب الطلبات";
pub const ORDER_NOT_FOUND: &str = "الطلب غير موجود";
pub const CREATE_ORDER: &str = "فشل في إنشاء الطلب";
pub const UPDATE_ORDER_STATUS: &str = "فشل في تحديث حالة الطلب";
pub const DELETE_ORDER: &str = "فشل في حذف الطلب";
pub const ORDER_IDENTITY: &str = "بيانات العميل غير مكتملة";
pub const FETCH_ORDER_STATS: &str = "فشل في جلب إحصائيات الطلبات";

// Blog
pub const FETCH_POSTS: &str = "فشل في جلب المقالات";
pub const POST_NOT_FOUND: &str = "المقال غير موجود";
pub const CREATE_POST: &str = "فشل في إضافة المقال";
pub const UPDATE_POST: &str = "فشل في تحديث المقال";
pub const DELETE_POST: &str = "فشل في حذف المقال";

// Banners
pub const FETCH_BANNERS: &str = "فشل في جلب البنرات";
pub const BANNER_NOT_FOUND: &str = "البنر غير موجود";
pub const CREATE_BANNER: &str = "فشل في إضافة البنر";
pub const UPDATE_BANNER: &str = "فشل في تحديث البنر";
pub const DELETE_BANNER: &str = "فشل في حذف البنر";

// Combo offers
pub const FETCH_COMBOS: &str = "فشل في جلب العروض المجمعة";
pub const COMBO_NOT_FOUND: &str = "العرض غير موجود";
pub const CREATE_COMBO: &str = "فشل في إضافة العرض";
pub const UPDATE_COMBO: &str = "فشل في تحديث العرض";
pub const DELETE_COMBO: &str = "فشل في حذف العرض";

// Testimonials
pub const FETCH_TESTIMONIALS: &str = "فشل في جلب آراء العملاء";
pub const TESTIMONIAL_NOT_FOUND: &str = "الرأي غير موجود";
pub const CREATE_TESTIMONIAL: &str = "فشل في إضافة الرأي";
pub const UPDATE_TESTIMONIAL: &str = "فشل في تحديث الرأي";
pub const DELETE_TESTIMONIAL: &str = "فشل في حذف الرأي";

// Branches
pub const FETCH_BRANCHES: &str = "فشل في جلب الفروع";
pub const BRANCH_NOT_FOUND: &str = "الفرع غير موجود";
pub const CREATE_BRANCH: &str = "فشل في إضافة الفرع";
pub const UPDATE_BRANCH: &str = "فشل في تحديث الفرع";
pub const DELETE_BRANCH: &str = "فشل في حذف الفرع";

// Gallery
pub const FETCH_GALLERY: &str = "فشل في جلب معرض الصور";
pub const GALLERY_IMAGE_NOT_FOUND: &str = "الصورة غير موجودة";
pub const CREATE_GALLERY_IMAGE: &str = "فشل في إضافة الصورة";
pub const UPDATE_GALLERY_IMAGE: &str = "فشل في تحديث الصورة";
pub const DELETE_GALLERY_IMAGE: &str = "فشل في حذف الصورة";

// Users
pub const FETCH_USERS: &str = "فشل في جلب المستخدمين";
pub const USER_NOT_FOUND: &str = "المستخدم غير موجود";
pub const UPDATE_USER: &str = "فشل في تحديث المستخدم";
pub const DELETE_USER: &str = "فشل في حذف المستخدم";

// Categories
pub const FETCH_CATEGORIES: &str = "فشل في جلب التصنيفات";
pub const CATEGORY_NOT_FOUND: &str = "التصنيف غير موجود";
pub const CREATE_CATEGORY: &str = "فشل في إضافة التصنيف";
pub const UPDATE_CATEGORY: &str = "فشل في تحديث التصنيف";
pub const DELETE_CATEGORY: &str = "فشل في حذف التصنيف";

// Media
pub const UPLOAD_MEDIA: &str = "فشل في رفع الصورة";

// Stats
pub const FETCH_STATS: &str = "فشل في جلب الإحصائيات";
