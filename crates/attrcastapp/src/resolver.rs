//! Target type resolution for `object` filters.

use crate::error::FilterError;
use crate::options::{ClassOption, FilterOptions};
use crate::types::{ObjectType, TypeLookup};
use heck::ToUpperCamelCase;
use std::sync::Arc;

/// Turn a snake-cased path into a type name.
///
/// `/` separates namespace segments, which come out joined by `::`:
///
/// ```
/// use attrcastapp::resolver::camelize;
///
/// assert_eq!(camelize("account"), "Account");
/// assert_eq!(camelize("user_account"), "UserAccount");
/// assert_eq!(camelize("admin/user_account"), "Admin::UserAccount");
/// assert_eq!(camelize("Account"), "Account");
/// assert_eq!(camelize("Admin::User"), "Admin::User");
/// ```
pub fn camelize(name: &str) -> String {
    name.split('/')
        .flat_map(|segment| segment.split("::"))
        .map(|segment| segment.to_upper_camel_case())
        .collect::<Vec<_>>()
        .join("::")
}

/// Resolve the target type for `attribute`.
///
/// A type handle in the `class` option is used as is. A `class` name, or the
/// attribute name when no `class` is given, is camelized and looked up in
/// `namespace`.
pub fn resolve(
    options: &FilterOptions,
    attribute: &str,
    namespace: &dyn TypeLookup,
) -> Result<Arc<dyn ObjectType>, FilterError> {
    let class_name = match &options.class {
        Some(ClassOption::Type(ty)) => return Ok(Arc::clone(ty)),
        Some(ClassOption::Name(name)) => camelize(name),
        None => camelize(attribute),
    };

    match namespace.lookup(&class_name) {
        Some(ty) => {
            tracing::debug!(attribute, class = %class_name, "resolved target type");
            Ok(ty)
        }
        None => {
            tracing::debug!(attribute, class = %class_name, "target type not found");
            Err(FilterError::TypeResolution {
                attribute: attribute.to_string(),
                class_name,
            })
        }
    }
}
