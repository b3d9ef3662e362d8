//! Filter request parsing
//!
//! Parses a JSON filter request into filters bound to a catalog entity:
//!
//! ```json
//! {
//!   "entity": "Widget",
//!   "filters": [
//!     {"type": "field", "match": "all",
//!      "criteria": [{"field": "Age", "op": ">=", "value": 18}]},
//!     {"type": "free_text", "terms": "widget", "all_text_fields": true}
//!   ]
//! }
//! ```

use serde::Deserialize;

use super::field_filter::FieldFilter;
use super::free_text::FreeTextFilter;
use super::types::{Criterion, MatchMode};
use super::{AppendConstraints, Filter};
use crate::data::error::{FilterError, FilterResult};
use crate::data::schema::{Catalog, EntitySchema, FieldKind};
use crate::data::sql::SqlDialect;
use crate::data::statement::{CompiledQuery, Statement, Value};

/// Maximum size of request JSON in bytes (64KB)
const MAX_REQUEST_JSON_SIZE: usize = 64 * 1024;

/// Maximum number of filters allowed in one request
const MAX_FILTERS: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RequestSpec {
    entity: String,
    #[serde(default)]
    filters: Vec<FilterSpec>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum FilterSpec {
    Field {
        #[serde(default, rename = "match")]
        mode: MatchMode,
        #[serde(default)]
        fields: Vec<String>,
        #[serde(default)]
        criteria: Vec<CriterionSpec>,
    },
    FreeText {
        terms: Option<String>,
        #[serde(default)]
        fields: Vec<String>,
        #[serde(default)]
        all_text_fields: bool,
        #[serde(default, rename = "match")]
        mode: MatchMode,
        #[serde(default)]
        criteria: Vec<CriterionSpec>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CriterionSpec {
    field: String,
    op: CriterionOp,
    #[serde(default)]
    value: serde_json::Value,
}

#[derive(Debug, Clone, Copy, Deserialize)]
enum CriterionOp {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "<>")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Gte,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Lte,
    #[serde(rename = "between")]
    Between,
    #[serde(rename = "in")]
    In,
    #[serde(rename = "contains")]
    Contains,
    #[serde(rename = "starts_with")]
    StartsWith,
    #[serde(rename = "ends_with")]
    EndsWith,
    #[serde(rename = "is null")]
    IsNull,
    #[serde(rename = "is not null")]
    IsNotNull,
}

/// A parsed request: the resolved entity and its configured filters
#[derive(Debug)]
pub struct ParsedRequest<'c> {
    pub schema: &'c EntitySchema,
    pub filters: Vec<Filter<'c>>,
}

/// Parse a filter request against `catalog`
///
/// Validates JSON size and filter count, resolves the entity and every field
/// name. Emission preconditions (search terms, searchable fields) are left to
/// `append_constraints`.
pub fn parse_request<'c>(
    catalog: &'c Catalog,
    json_str: &str,
) -> FilterResult<ParsedRequest<'c>> {
    if json_str.len() > MAX_REQUEST_JSON_SIZE {
        return Err(FilterError::InvalidRequest(format!(
            "request JSON exceeds maximum size of {} bytes",
            MAX_REQUEST_JSON_SIZE
        )));
    }

    let spec: RequestSpec =
        serde_json::from_str(json_str).map_err(|e| FilterError::InvalidRequest(e.to_string()))?;

    if spec.filters.len() > MAX_FILTERS {
        return Err(FilterError::InvalidRequest(format!(
            "maximum {} filters allowed",
            MAX_FILTERS
        )));
    }

    let schema = catalog.entity(&spec.entity)?;
    let filters = spec
        .filters
        .into_iter()
        .map(|f| build_filter(schema, f))
        .collect::<FilterResult<Vec<_>>>()?;

    tracing::debug!(entity = %schema.name, filters = filters.len(), "Parsed filter request");
    Ok(ParsedRequest { schema, filters })
}

/// Parse a request and emit all of its filters into one statement
pub fn compile_request(
    catalog: &Catalog,
    json_str: &str,
    dialect: &dyn SqlDialect,
    parameter_prefix: &str,
) -> FilterResult<CompiledQuery> {
    let ParsedRequest {
        schema,
        mut filters,
    } = parse_request(catalog, json_str)?;

    let mut statement = Statement::new(dialect).with_parameter_prefix(parameter_prefix);
    for filter in &mut filters {
        filter.append_constraints(&mut statement)?;
    }
    statement.finish_select(schema)
}

fn build_filter<'c>(schema: &'c EntitySchema, spec: FilterSpec) -> FilterResult<Filter<'c>> {
    match spec {
        FilterSpec::Field {
            mode,
            fields,
            criteria,
        } => {
            let mut filter = FieldFilter::new(schema);
            filter.set_mode(mode);
            for name in &fields {
                filter.add_field(name)?;
            }
            apply_criteria(&mut filter, criteria)?;
            Ok(Filter::Field(filter))
        }
        FilterSpec::FreeText {
            terms,
            fields,
            all_text_fields,
            mode,
            criteria,
        } => {
            let mut filter = FreeTextFilter::new(schema);
            if let Some(terms) = terms {
                filter.set_terms(terms);
            }
            for name in &fields {
                filter.add_field(name)?;
            }
            if all_text_fields {
                filter.add_all_text_fields();
            }
            filter.base_mut().set_mode(mode);
            apply_criteria(filter.base_mut(), criteria)?;
            Ok(Filter::FreeText(filter))
        }
    }
}

fn apply_criteria(
    filter: &mut FieldFilter<'_>,
    criteria: Vec<CriterionSpec>,
) -> FilterResult<()> {
    for spec in criteria {
        let field = filter.resolve(&spec.field)?;
        let criterion = to_criterion(spec.op, &spec.value, field.kind)
            .map_err(|e| FilterError::InvalidRequest(format!("field '{}': {}", spec.field, e)))?;
        filter.set_criterion(&spec.field, criterion)?;
    }
    Ok(())
}

fn to_criterion(
    op: CriterionOp,
    value: &serde_json::Value,
    kind: FieldKind,
) -> Result<Criterion, String> {
    let scalar = || Value::from_json(value, kind);
    let text = || {
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| format!("expected a string pattern, got {}", value))
    };
    let list = || {
        value
            .as_array()
            .ok_or_else(|| format!("expected an array, got {}", value))
    };

    Ok(match op {
        CriterionOp::Eq => Criterion::Equals(scalar()?),
        CriterionOp::Ne => Criterion::NotEquals(scalar()?),
        CriterionOp::Gt => Criterion::GreaterThan(scalar()?),
        CriterionOp::Gte => Criterion::GreaterOrEqual(scalar()?),
        CriterionOp::Lt => Criterion::LessThan(scalar()?),
        CriterionOp::Lte => Criterion::LessOrEqual(scalar()?),
        CriterionOp::Between => match list()?.as_slice() {
            [lo, hi] => {
                Criterion::Between(Value::from_json(lo, kind)?, Value::from_json(hi, kind)?)
            }
            _ => return Err("between expects exactly two bounds".to_string()),
        },
        CriterionOp::In => Criterion::In(
            list()?
                .iter()
                .map(|v| Value::from_json(v, kind))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        CriterionOp::Contains => Criterion::Contains(text()?),
        CriterionOp::StartsWith => Criterion::StartsWith(text()?),
        CriterionOp::EndsWith => Criterion::EndsWith(text()?),
        CriterionOp::IsNull => Criterion::IsNull,
        CriterionOp::IsNotNull => Criterion::IsNotNull,
    })
}
