//! Cross-filter behavior: parameter uniqueness, merging and failure atomicity

use rustc_hash::FxHashSet;

use super::*;
use crate::data::error::FilterError;
use crate::data::schema::{FieldKind, SchemaField};
use crate::data::sql::{Backend, MssqlDialect, MysqlDialect};
use crate::data::statement::{ParameterBinding, Value};

fn widget() -> EntitySchema {
    EntitySchema::new(
        "Widget",
        "widgets",
        vec![
            SchemaField::new("Name", "Name", FieldKind::Text),
            SchemaField::new("Age", "Age", FieldKind::Integer),
        ],
    )
}

fn catalogue_item() -> EntitySchema {
    EntitySchema::new(
        "Item",
        "items",
        vec![
            SchemaField::new("Sku", "sku", FieldKind::AnsiFixedText),
            SchemaField::new("Title", "title", FieldKind::Text),
            SchemaField::new("Price", "price", FieldKind::Decimal),
            SchemaField::new("Summary", "summary", FieldKind::AnsiText),
            SchemaField::new("Added", "added_at", FieldKind::DateTime),
            SchemaField::new("Region", "region", FieldKind::FixedText),
        ],
    )
}

fn snapshot(statement: &Statement<'_>) -> (Vec<String>, Vec<ParameterBinding>) {
    (statement.fragments().to_vec(), statement.parameters().to_vec())
}

#[test]
fn freetext_single_field_example() {
    let schema = widget();
    let mut filter = FreeTextFilter::new(&schema);
    filter.set_terms("widget").add_field("Name").unwrap();

    let mut statement = Statement::new(&MysqlDialect);
    filter.append_constraints(&mut statement).unwrap();

    assert_eq!(statement.where_clause().unwrap(), "FREETEXT(`Name`, @p1)");
    assert_eq!(
        statement.parameters(),
        [ParameterBinding {
            name: "p1".into(),
            kind: FieldKind::Text,
            value: Value::Text("widget".into()),
        }]
    );
}

#[test]
fn all_text_fields_one_predicate_each_one_binding() {
    let schema = catalogue_item();
    let mut filter = FreeTextFilter::new(&schema);
    filter.set_terms("lamp").add_all_text_fields();

    let mut statement = Statement::new(&MssqlDialect);
    filter.append_constraints(&mut statement).unwrap();

    let clause = statement.where_clause().unwrap();
    let predicates: Vec<&str> = clause.split(" OR ").collect();
    assert_eq!(
        predicates,
        vec![
            "FREETEXT([sku], @p1)",
            "FREETEXT([title], @p1)",
            "FREETEXT([summary], @p1)",
            "FREETEXT([region], @p1)",
        ]
    );
    assert_eq!(statement.parameters().len(), 1);
}

#[test]
fn add_all_text_fields_is_idempotent() {
    let schema = catalogue_item();
    let mut once = FreeTextFilter::new(&schema);
    once.add_all_text_fields();

    let mut twice = FreeTextFilter::new(&schema);
    twice.add_field("Summary").unwrap();
    twice.add_all_text_fields().add_all_text_fields();

    let mut thrice = FreeTextFilter::new(&schema);
    thrice.add_all_text_fields().add_all_text_fields();

    let names = |f: &FreeTextFilter<'_>| -> Vec<String> {
        f.search_fields().iter().map(|f| f.name.clone()).collect()
    };
    assert_eq!(names(&once), names(&thrice));
    assert_eq!(once.search_fields().len(), 4);
    // a field added earlier keeps its position
    assert_eq!(names(&twice)[0], "Summary");
    assert_eq!(twice.search_fields().len(), 4);
}

#[test]
fn parameter_names_unique_across_filters() {
    let schema = catalogue_item();
    let mut statement = Statement::new(Backend::Postgres.dialect());

    for i in 0..5 {
        let mut filter = FieldFilter::new(&schema);
        filter
            .set_criterion("Price", Criterion::GreaterThan(Value::Decimal(format!("{}.5", i))))
            .unwrap();
        filter
            .set_criterion("Title", Criterion::In(vec!["a".into(), "b".into()]))
            .unwrap();
        filter.append_constraints(&mut statement).unwrap();
    }

    let names: FxHashSet<&str> = statement.parameters().iter().map(|p| p.name.as_str()).collect();
    assert_eq!(statement.parameters().len(), 15);
    assert_eq!(names.len(), 15);
}

#[test]
fn merge_law_with_base_constraints() {
    let schema = widget();
    let configure_base = |base: &mut FieldFilter<'_>| {
        base.set_criterion("Age", Criterion::GreaterThan(Value::Integer(3)))
            .unwrap();
        base.set_criterion("Name", Criterion::StartsWith("w".into()))
            .unwrap();
    };

    // B: what the base emission alone produces
    let mut base = FieldFilter::new(&schema);
    configure_base(&mut base);
    let mut base_statement = Statement::new(&MssqlDialect);
    base.append_constraints(&mut base_statement).unwrap();
    let b = base_statement.where_clause().unwrap();
    assert_eq!(b, "[Age] > @p1 AND [Name] LIKE @p2 ESCAPE '\\'");

    let mut search = FreeTextFilter::new(&schema);
    search.set_terms("gear").add_field("Name").unwrap();
    configure_base(search.base_mut());
    let mut statement = Statement::new(&MssqlDialect);
    search.append_constraints(&mut statement).unwrap();

    let s = "FREETEXT([Name], @p3)";
    assert_eq!(statement.where_clause().unwrap(), format!("({}) AND ({})", b, s));
}

#[test]
fn merge_law_keeps_any_mode_base_grouped() {
    let schema = widget();
    let mut search = FreeTextFilter::new(&schema);
    search.set_terms("gear").add_field("Name").unwrap();
    search
        .base_mut()
        .set_mode(MatchMode::Any)
        .set_criterion("Age", Criterion::Equals(Value::Integer(7)))
        .unwrap()
        .set_criterion("Name", Criterion::Equals("cog".into()))
        .unwrap();

    let mut statement = Statement::new(&MssqlDialect);
    search.append_constraints(&mut statement).unwrap();

    assert_eq!(
        statement.where_clause().unwrap(),
        "([Age] = @p1 OR [Name] = @p2) AND (FREETEXT([Name], @p3))"
    );
}

#[test]
fn merge_law_without_base_constraints() {
    let schema = widget();
    let mut search = FreeTextFilter::new(&schema);
    search.set_terms("gear").add_field("Name").unwrap();
    let mut statement = Statement::new(&MssqlDialect);
    search.append_constraints(&mut statement).unwrap();
    assert_eq!(statement.where_clause().unwrap(), "FREETEXT([Name], @p1)");
}

#[test]
fn sibling_filters_keep_their_grouping() {
    let schema = catalogue_item();
    let mut statement = Statement::new(&MssqlDialect);

    let mut either = FieldFilter::new(&schema);
    either.set_mode(MatchMode::Any);
    either
        .set_criterion("Region", Criterion::Equals("EU".into()))
        .unwrap();
    either
        .set_criterion("Price", Criterion::LessThan(Value::Decimal("10".into())))
        .unwrap();

    let mut search = FreeTextFilter::new(&schema);
    search
        .set_terms("lamp")
        .add_field("Title")
        .unwrap()
        .add_field("Summary")
        .unwrap();

    let mut filters: Vec<Filter<'_>> = vec![either.into(), search.into()];
    for filter in &mut filters {
        filter.append_constraints(&mut statement).unwrap();
    }

    assert_eq!(
        statement.where_clause().unwrap(),
        "([region] = @p1 OR [price] < @p2) AND \
         (FREETEXT([title], @p3) OR FREETEXT([summary], @p3))"
    );
    assert!(filters.iter().all(Filter::is_emitted));
}

#[test]
fn empty_terms_leave_statement_unchanged() {
    let schema = widget();
    let mut statement = Statement::new(&MssqlDialect);

    let mut prior = FieldFilter::new(&schema);
    prior.set_criterion("Age", Criterion::IsNotNull).unwrap();
    prior.append_constraints(&mut statement).unwrap();
    let before = snapshot(&statement);

    let mut search = FreeTextFilter::new(&schema);
    search.set_terms("").add_all_text_fields();
    assert_eq!(
        search.append_constraints(&mut statement),
        Err(FilterError::MissingSearchTerms)
    );
    assert_eq!(snapshot(&statement), before);
}

#[test]
fn empty_field_set_leaves_statement_unchanged() {
    let schema = widget();
    let mut statement = Statement::new(&MssqlDialect);
    statement.bind(FieldKind::Integer, Value::Integer(7));
    let before = snapshot(&statement);

    let mut search = FreeTextFilter::new(&schema);
    search.set_terms("widget");
    search
        .base_mut()
        .set_criterion("Age", Criterion::Equals(Value::Integer(1)))
        .unwrap();
    let err = search.append_constraints(&mut statement).unwrap_err();
    assert_eq!(err, FilterError::NoSearchableFields);
    assert_eq!(err.to_string(), "No free-text fields were specified");
    assert_eq!(snapshot(&statement), before);
    assert_eq!(statement.registry().issued_count(), 1);
}

#[test]
fn schema_without_text_fields_has_nothing_to_search() {
    let schema = EntitySchema::new(
        "Reading",
        "readings",
        vec![SchemaField::new("Value", "value", FieldKind::Float)],
    );
    let mut search = FreeTextFilter::new(&schema);
    search.set_terms("x").add_all_text_fields();
    let mut statement = Statement::new(&MssqlDialect);
    assert_eq!(
        search.append_constraints(&mut statement),
        Err(FilterError::NoSearchableFields)
    );
}
