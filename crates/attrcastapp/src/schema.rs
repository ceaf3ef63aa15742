//! # Schemas
//!
//! A [`Schema`] is an ordered set of attribute filters, built once from
//! declarations and then used to validate any number of input maps.
//!
//! Filter kinds are looked up when the schema is built, so an unknown kind
//! or a malformed declaration fails before any input is seen. Validation
//! never stops at the first bad attribute (unless `fail_fast` is set): every
//! failure is recorded in the pass's [`AttributeContext`], and the typed
//! values are handed out only when no attribute failed.
//!
//! [`SchemaFile`] is the JSON form of a schema, as read by the CLI:
//!
//! ```json
//! {
//!   "types": [{ "name": "Account" }, { "name": "Owner", "any_of": ["User", "Team"] }],
//!   "attributes": [
//!     { "name": "account", "kind": "object" },
//!     { "name": "limit", "kind": "integer", "options": { "default": 10 } }
//!   ]
//! }
//! ```

use crate::context::{AttributeContext, ValidationErrors};
use crate::error::{AttrcastError, Result};
use crate::filters::Filter;
use crate::options::FilterSpec;
use crate::registry::{build_filter, Registry};
use crate::types::{AnyOfType, NamedType, TypeNamespace};
use crate::value::Value;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub struct Schema {
    filters: Vec<Box<dyn Filter>>,
    fail_fast: bool,
}

impl Schema {
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// The attribute filters, in declaration order.
    pub fn attributes(&self) -> impl Iterator<Item = &dyn Filter> {
        self.filters.iter().map(|f| f.as_ref())
    }

    pub fn attribute(&self, name: &str) -> Option<&dyn Filter> {
        self.attributes().find(|f| f.name() == name)
    }

    pub fn fail_fast(&self) -> bool {
        self.fail_fast
    }

    /// Run one validation pass over `inputs`.
    ///
    /// Inputs without a declared attribute are ignored; declared attributes
    /// without an input are cleaned from `Null`.
    pub fn validate(
        &self,
        inputs: &BTreeMap<String, Value>,
    ) -> std::result::Result<BTreeMap<String, Value>, ValidationErrors> {
        let mut context = AttributeContext::new();

        for filter in &self.filters {
            let raw = inputs.get(filter.name()).cloned().unwrap_or(Value::Null);
            match filter.clean(raw, &context) {
                Ok(value) => context.set_value(filter.name(), value),
                Err(err) => {
                    tracing::warn!(attribute = filter.name(), error = %err, "attribute rejected");
                    context.add_error(filter.name(), err);
                    if self.fail_fast {
                        break;
                    }
                }
            }
        }

        context.into_result()
    }
}

#[derive(Debug, Default)]
pub struct SchemaBuilder {
    registry: Option<Registry>,
    specs: Vec<Declared>,
    fail_fast: bool,
}

#[derive(Debug)]
enum Declared {
    Spec(FilterSpec),
    Filter(Box<dyn Filter>),
}

impl Declared {
    fn name(&self) -> &str {
        match self {
            Declared::Spec(spec) => &spec.name,
            Declared::Filter(filter) => filter.name(),
        }
    }
}

impl SchemaBuilder {
    /// Build filters through `registry` instead of the process-wide one.
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn attribute(mut self, spec: FilterSpec) -> Self {
        self.specs.push(Declared::Spec(spec));
        self
    }

    /// Add an already constructed filter.
    pub fn filter(mut self, filter: Box<dyn Filter>) -> Self {
        self.specs.push(Declared::Filter(filter));
        self
    }

    pub fn fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    pub fn build(self) -> Result<Schema> {
        let mut seen = HashSet::new();
        let mut filters = Vec::with_capacity(self.specs.len());

        for declared in self.specs {
            if !seen.insert(declared.name().to_string()) {
                return Err(AttrcastError::declaration(
                    declared.name(),
                    "attribute is declared twice",
                ));
            }
            let filter = match declared {
                Declared::Filter(filter) => filter,
                Declared::Spec(spec) => match &self.registry {
                    Some(registry) => registry.build(spec)?,
                    None => build_filter(spec)?,
                },
            };
            tracing::debug!(attribute = filter.name(), kind = filter.kind(), "declared attribute");
            filters.push(filter);
        }

        Ok(Schema {
            filters,
            fail_fast: self.fail_fast,
        })
    }
}

/// A type declared by a schema file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    pub name: String,
    /// Member types whose instances this type also accepts.
    #[serde(default)]
    pub any_of: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaFile {
    #[serde(default)]
    pub types: Vec<TypeDecl>,
    pub attributes: Vec<FilterSpec>,
}

impl SchemaFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Define the declared types into `namespace`, replacing any of the
    /// same name.
    pub fn define_types(&self, namespace: &TypeNamespace) {
        for decl in &self.types {
            if decl.any_of.is_empty() {
                namespace.define(NamedType::new(&decl.name));
            } else {
                namespace.define(AnyOfType::new(&decl.name, decl.any_of.iter().cloned()));
            }
        }
    }

    /// Build the schema through the process-wide registry.
    pub fn into_schema(self, fail_fast: bool) -> Result<Schema> {
        self.attributes
            .into_iter()
            .fold(Schema::builder().fail_fast(fail_fast), SchemaBuilder::attribute)
            .build()
    }
}

/// Read an input document. The top level must be a JSON object.
pub fn load_inputs(path: &Path) -> Result<BTreeMap<String, Value>> {
    let text = fs::read_to_string(path)?;
    parse_inputs(&text)
}

pub fn parse_inputs(text: &str) -> Result<BTreeMap<String, Value>> {
    let json: serde_json::Value = serde_json::from_str(text)?;
    match Value::from(json) {
        Value::Hash(map) => Ok(map),
        other => Err(AttrcastError::InvalidInput(format!(
            "expected a JSON object of attributes, got {}",
            other.describe()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FilterError;
    use crate::filters::ObjectFilter;
    use crate::options::FilterOptions;
    use crate::test_utils::CountingLookup;
    use crate::types::TypeLookup;
    use crate::value::Instance;
    use std::sync::Arc;

    fn inputs(pairs: &[(&str, Value)]) -> BTreeMap<String, Value> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn object(name: &str, options: FilterOptions, lookup: &Arc<CountingLookup>) -> Box<dyn Filter> {
        let namespace: Arc<dyn TypeLookup> = lookup.clone();
        Box::new(ObjectFilter::with_namespace(name, options, namespace))
    }

    #[test]
    fn test_account_inferred_from_name() {
        let lookup = CountingLookup::with_types([NamedType::new("Account")]);
        let schema = Schema::builder()
            .filter(object("account", FilterOptions::new(), &lookup))
            .build()
            .unwrap();

        let account = Value::instance(Instance::new("Account"));
        let typed = schema.validate(&inputs(&[("account", account.clone())])).unwrap();
        assert_eq!(typed.get("account"), Some(&account));
    }

    #[test]
    fn test_explicit_class_option() {
        let lookup = CountingLookup::with_types([NamedType::new("User")]);
        let schema = Schema::builder()
            .filter(object("account", FilterOptions::new().class("User"), &lookup))
            .build()
            .unwrap();

        let user = Value::instance(Instance::new("User"));
        let typed = schema.validate(&inputs(&[("account", user.clone())])).unwrap();
        assert_eq!(typed["account"], user);
    }

    #[test]
    fn test_missing_type_is_resolution_error() {
        let lookup = CountingLookup::with_types(Vec::<NamedType>::new());
        let schema = Schema::builder()
            .filter(object("account", FilterOptions::new(), &lookup))
            .build()
            .unwrap();

        let errors = schema
            .validate(&inputs(&[("account", Value::instance(Instance::new("Account")))]))
            .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.0[0].error,
            FilterError::TypeResolution {
                attribute: "account".into(),
                class_name: "Account".into(),
            }
        );
        assert!(errors.to_string().contains("\"Account\""));
    }

    #[test]
    fn test_plain_hash_is_mismatch_for_widget() {
        let lookup = CountingLookup::with_types([NamedType::new("Gadget")]);
        let schema = Schema::builder()
            .filter(object("widget", FilterOptions::new().class("Gadget"), &lookup))
            .build()
            .unwrap();

        let raw = Value::Hash(inputs(&[("size", Value::Integer(1))]));
        let errors = schema.validate(&inputs(&[("widget", raw)])).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.0[0].attribute, "widget");
        assert!(matches!(errors.0[0].error, FilterError::TypeMismatch { .. }));
        assert_eq!(lookup.lookups(), 2);
    }

    #[test]
    fn test_siblings_still_validated_after_failure() {
        let schema = Schema::builder()
            .registry(Registry::with_builtins())
            .attribute(FilterSpec::new("count", "integer"))
            .attribute(FilterSpec::new("name", "string"))
            .attribute(FilterSpec::new("active", "boolean"))
            .build()
            .unwrap();

        let errors = schema
            .validate(&inputs(&[
                ("count", Value::string("many")),
                ("name", Value::string("ok")),
            ]))
            .unwrap_err();
        let failed: Vec<&str> = errors.iter().map(|e| e.attribute.as_str()).collect();
        assert_eq!(failed, vec!["count", "active"]);
    }

    #[test]
    fn test_fail_fast_stops_at_first_error() {
        let schema = Schema::builder()
            .registry(Registry::with_builtins())
            .attribute(FilterSpec::new("count", "integer"))
            .attribute(FilterSpec::new("active", "boolean"))
            .fail_fast(true)
            .build()
            .unwrap();

        let errors = schema.validate(&BTreeMap::new()).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.0[0].attribute, "count");
    }

    #[test]
    fn test_typed_values_and_ignored_inputs() {
        let schema = Schema::builder()
            .registry(Registry::with_builtins())
            .attribute(FilterSpec::new("count", "integer"))
            .attribute(
                FilterSpec::new("note", "string").with_options(FilterOptions::new().optional()),
            )
            .build()
            .unwrap();

        let typed = schema
            .validate(&inputs(&[
                ("count", Value::string("7")),
                ("unknown", Value::Bool(true)),
            ]))
            .unwrap();
        assert_eq!(
            typed,
            inputs(&[("count", Value::Integer(7)), ("note", Value::Null)])
        );
    }

    #[test]
    fn test_lazy_default_reads_earlier_sibling() {
        let schema = Schema::builder()
            .registry(Registry::with_builtins())
            .attribute(FilterSpec::new("first", "string"))
            .attribute(FilterSpec::new("display", "string").with_options(
                FilterOptions::new().default_lazy(|ctx| {
                    ctx.value("first").cloned().unwrap_or(Value::Null)
                }),
            ))
            .build()
            .unwrap();

        let typed = schema
            .validate(&inputs(&[("first", Value::string(" Ada "))]))
            .unwrap();
        assert_eq!(typed["display"], Value::string("Ada"));
    }

    #[test]
    fn test_duplicate_attribute_rejected() {
        let err = Schema::builder()
            .registry(Registry::with_builtins())
            .attribute(FilterSpec::new("count", "integer"))
            .attribute(FilterSpec::new("count", "float"))
            .build()
            .unwrap_err();
        assert!(matches!(err, AttrcastError::Declaration { ref attribute, .. } if attribute == "count"));
    }

    #[test]
    fn test_unknown_kind_fails_at_build() {
        let err = Schema::builder()
            .registry(Registry::with_builtins())
            .attribute(FilterSpec::new("price", "money"))
            .build()
            .unwrap_err();
        assert!(matches!(err, AttrcastError::Registry(_)));
    }

    #[test]
    fn test_schema_file_from_json() {
        let file = SchemaFile::from_json(
            r#"{
                "types": [{ "name": "Owner", "any_of": ["User", "Team"] }],
                "attributes": [
                    { "name": "limit", "kind": "integer", "options": { "default": 10 } },
                    { "name": "tags", "kind": "array", "nested": [{ "name": "tag", "kind": "string" }] }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(file.types[0].any_of, vec!["User", "Team"]);

        let namespace = TypeNamespace::new();
        file.define_types(&namespace);
        let owner = namespace.lookup("Owner").unwrap();
        assert!(owner.matches(&Value::instance(Instance::new("Team"))));

        let schema = file.into_schema(false).unwrap();
        let typed = schema
            .validate(&inputs(&[(
                "tags",
                Value::Array(vec![Value::string("a"), Value::symbol("b")]),
            )]))
            .unwrap();
        assert_eq!(typed["limit"], Value::Integer(10));
        assert_eq!(
            typed["tags"],
            Value::Array(vec![Value::string("a"), Value::string("b")])
        );
    }

    #[test]
    fn test_schema_file_rejects_unknown_fields() {
        assert!(SchemaFile::from_json(r#"{ "attributes": [], "extra": 1 }"#).is_err());
    }

    #[test]
    fn test_inputs_must_be_object() {
        assert!(parse_inputs(r#"{ "a": 1 }"#).is_ok());
        assert!(matches!(
            parse_inputs("[1, 2]"),
            Err(AttrcastError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let schema_path = dir.path().join("schema.json");
        let input_path = dir.path().join("input.json");
        fs::write(
            &schema_path,
            r#"{ "attributes": [{ "name": "when", "kind": "date" }] }"#,
        )
        .unwrap();
        fs::write(&input_path, r#"{ "when": "2024-06-01" }"#).unwrap();

        let schema = SchemaFile::load(&schema_path).unwrap().into_schema(false).unwrap();
        let typed = schema.validate(&load_inputs(&input_path).unwrap()).unwrap();
        assert_eq!(
            typed["when"],
            Value::Date(chrono::NaiveDate::from_ymd_opt(2024, 6, 1).unwrap())
        );
    }
}
