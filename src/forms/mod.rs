/// Form validation - Gateway
mod validate;

pub use validate::{
    normalize_user_update, validate_admin_access, validate_blog_delete, validate_blog_update,
    validate_delete_account, validate_login, validate_migration, validate_new_blog,
    validate_register, validate_user_update, FieldError, ValidationErrors,
};
