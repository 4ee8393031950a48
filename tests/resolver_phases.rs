use std::sync::{Arc, Mutex};

use anyhow::Result;
use serde_json::json;

use param_resolver_rs::{Param, RequestInput, Resolver, ValidationError};

#[test]
fn individual_failures_pre_empt_post_validation() -> Result<()> {
    let resolver = Resolver::builder()
        .param(Param::<String>::new("token").required().from_header("X-Token"))
        .param(
            Param::<i64>::new("page")
                .from_query("page")
                .default_value(0)
                .post_validate(|page| {
                    if *page < 1 {
                        vec![ValidationError::new("page must be positive")]
                    } else {
                        Vec::new()
                    }
                }),
        )
        .build()?;

    // "page" would fail post-validation, but the missing required "token"
    // ends the run first and post-validators never run.
    let outcome = resolver.resolve(&json!({}));

    assert!(!outcome.is_success());
    let message = outcome.error_message().unwrap();
    assert!(message.contains("required parameter (token) missing"));
    assert!(!message.contains("page must be positive"));
    Ok(())
}

#[test]
fn failure_messages_aggregate_in_declaration_order() -> Result<()> {
    let resolver = Resolver::builder()
        .param(Param::<String>::new("first").required().from_query("first"))
        .param(Param::<String>::new("second").required().from_query("second"))
        .build()?;

    let outcome = resolver.resolve(&json!({}));

    assert!(!outcome.is_success());
    let message = outcome.error_message().unwrap();
    let first = message.find("required parameter (first) missing").unwrap();
    let second = message.find("required parameter (second) missing").unwrap();
    assert!(first < second);
    Ok(())
}

#[test]
fn post_validation_errors_aggregate_per_parameter() -> Result<()> {
    let resolver = Resolver::builder()
        .param(
            Param::<i64>::new("page")
                .from_query("page")
                .default_value(0)
                .post_validate(|page| {
                    if *page < 1 {
                        vec![ValidationError::new("page must be positive")]
                    } else {
                        Vec::new()
                    }
                }),
        )
        .param(
            Param::<i64>::new("limit")
                .from_query("limit")
                .default_value(1000)
                .post_validate(|limit| {
                    if *limit > 100 {
                        vec![ValidationError::new("limit cannot exceed 100")]
                    } else {
                        Vec::new()
                    }
                }),
        )
        .build()?;

    let outcome = resolver.resolve(&json!({}));

    assert!(!outcome.is_success());
    let message = outcome.error_message().unwrap();
    let page_header = message.find("parameter (page) failed validation").unwrap();
    let limit_header = message.find("parameter (limit) failed validation").unwrap();
    assert!(page_header < limit_header);
    assert!(message.contains("page must be positive"));
    assert!(message.contains("limit cannot exceed 100"));
    Ok(())
}

#[test]
fn clean_parameters_contribute_nothing_to_post_validation_failures() -> Result<()> {
    let resolver = Resolver::builder()
        .param(Param::<i64>::new("page").from_query("page").default_value(1))
        .param(
            Param::<i64>::new("limit")
                .from_query("limit")
                .default_value(1000)
                .post_validate(|limit| {
                    if *limit > 100 {
                        vec![ValidationError::new("limit cannot exceed 100")]
                    } else {
                        Vec::new()
                    }
                }),
        )
        .build()?;

    let outcome = resolver.resolve(&json!({}));

    assert!(!outcome.is_success());
    let message = outcome.error_message().unwrap();
    assert!(!message.contains("(page)"));
    Ok(())
}

#[test]
fn callbacks_fire_once_in_declaration_order_on_success() -> Result<()> {
    let fired: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let first_log = fired.clone();
    let second_log = fired.clone();

    let resolver = Resolver::builder()
        .param(
            Param::<i64>::new("page")
                .from_query("page")
                .default_value(1)
                .on_resolved(move |page| first_log.lock().unwrap().push(format!("page={page}"))),
        )
        .param(
            Param::<bool>::new("verbose")
                .from_query("verbose")
                .default_value(false)
                .on_resolved(move |verbose| {
                    second_log.lock().unwrap().push(format!("verbose={verbose}"))
                }),
        )
        .build()?;

    let input = RequestInput::new().query("page", "3").into_value();
    let outcome = resolver.resolve(&input);

    assert!(outcome.is_success());
    assert_eq!(
        *fired.lock().unwrap(),
        vec!["page=3".to_string(), "verbose=false".to_string()]
    );
    Ok(())
}

#[test]
fn callbacks_never_fire_on_individual_failure() -> Result<()> {
    let fired: Arc<Mutex<Vec<i64>>> = Arc::new(Mutex::new(Vec::new()));
    let log = fired.clone();

    let resolver = Resolver::builder()
        .param(Param::<String>::new("token").required().from_header("X-Token"))
        .param(
            Param::<i64>::new("page")
                .from_query("page")
                .default_value(1)
                .on_resolved(move |page| log.lock().unwrap().push(page)),
        )
        .build()?;

    let outcome = resolver.resolve(&json!({}));

    assert!(!outcome.is_success());
    assert!(fired.lock().unwrap().is_empty());
    Ok(())
}

#[test]
fn callbacks_never_fire_on_post_validation_failure() -> Result<()> {
    let fired: Arc<Mutex<Vec<i64>>> = Arc::new(Mutex::new(Vec::new()));
    let log = fired.clone();

    let resolver = Resolver::builder()
        .param(
            Param::<i64>::new("page")
                .from_query("page")
                .default_value(0)
                .post_validate(|page| {
                    if *page < 1 {
                        vec![ValidationError::new("page must be positive")]
                    } else {
                        Vec::new()
                    }
                })
                .on_resolved(move |page| log.lock().unwrap().push(page)),
        )
        .build()?;

    let outcome = resolver.resolve(&json!({}));

    assert!(!outcome.is_success());
    assert!(fired.lock().unwrap().is_empty());
    Ok(())
}

#[test]
fn repeated_runs_are_idempotent() -> Result<()> {
    let resolver = Resolver::builder()
        .param(Param::<i64>::new("page").from_query("page").default_value(1))
        .param(
            Param::<String>::new("sort")
                .from_query("sort")
                .default_value("asc".to_string()),
        )
        .build()?;

    let input = RequestInput::new().query("page", "5").into_value();
    let first = resolver.resolve(&input);
    let second = resolver.resolve(&input);

    assert_eq!(first.is_success(), second.is_success());
    assert_eq!(first.value("page"), second.value("page"));
    assert_eq!(first.value("sort"), second.value("sort"));
    Ok(())
}
