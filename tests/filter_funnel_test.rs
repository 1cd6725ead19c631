use std::sync::Arc;

use stack_curator::config::{ConfigStyle, FilterConfig};
use stack_curator::data_model::SourceRow;
use stack_curator::executor::FilterFunnel;
use stack_curator::pipeline::filters::{build_stages, PythonSyntaxValidator};

fn make_row(
    id: &str,
    file_size: i32,
    max_line_length: i32,
    avg_line_length: f32,
    alphanum_fraction: f32,
    content: &str,
) -> SourceRow {
    SourceRow {
        repo_name: id.to_string(),
        file_ext: "py".to_string(),
        content: content.to_string(),
        file_size,
        max_line_length,
        avg_line_length,
        alphanum_fraction,
        repo_lang: "python".to_string(),
    }
}

/// A row that clears every stage under the moderate preset.
fn good_row(id: &str) -> SourceRow {
    make_row(id, 200, 30, 20.0, 0.5, "x = 1\n")
}

fn moderate_funnel() -> FilterFunnel {
    let config = FilterConfig::from_style(ConfigStyle::Moderate);
    FilterFunnel::new(build_stages(&config, Arc::new(PythonSyntaxValidator)))
}

#[test]
fn kept_and_rejected_partition_the_input() {
    let rows = vec![
        good_row("r0"),
        make_row("r1", 10, 30, 20.0, 0.5, "x = 1\n"), // too small
        good_row("r2"),
        make_row("r3", 200, 1_000, 20.0, 0.5, "x = 1\n"), // line too long
        make_row("r4", 200, 30, 20.0, 0.5, "print 'x'\n"), // does not parse
    ];
    let total = rows.len();

    let outcome = moderate_funnel().run(rows);

    assert_eq!(outcome.kept.len() + outcome.rejected.len(), total);
    let mut indices: Vec<usize> = outcome
        .kept
        .iter()
        .map(|indexed| indexed.orig_index)
        .chain(outcome.rejected.iter().map(|rejected| rejected.orig_index))
        .collect();
    indices.sort_unstable();
    assert_eq!(indices, (0..total).collect::<Vec<usize>>());
}

#[test]
fn rejects_come_back_in_original_row_order() {
    // Failures deliberately hit stages out of input order: the ave_ll failure
    // is collected after the max_ll and file_too_small ones.
    let rows = vec![
        make_row("r0", 200, 30, 10.0, 0.5, "x = 1\n"), // fails ave_ll (stage 5)
        make_row("r1", 200, 1_000, 20.0, 0.5, "x = 1\n"), // fails max_ll (stage 1)
        good_row("r2"),
        make_row("r3", 10, 30, 20.0, 0.5, "x = 1\n"), // fails file_too_small (stage 2)
    ];

    let outcome = moderate_funnel().run(rows);

    let order: Vec<usize> = outcome.rejected.iter().map(|r| r.orig_index).collect();
    assert_eq!(order, vec![0, 1, 3]);
    let reasons: Vec<&str> = outcome.rejected.iter().map(|r| r.reason.as_str()).collect();
    assert_eq!(reasons, vec!["ave_ll", "max_ll", "file_too_small"]);
}

#[test]
fn row_failing_multiple_stages_gets_the_first_reason() {
    // Fails both the line-length range (stage 1) and the alphanumeric bounds
    // (stage 4); only the first stage may tag it.
    let rows = vec![make_row("r0", 200, 1_000, 20.0, 0.999, "x = 1\n")];

    let outcome = moderate_funnel().run(rows);

    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].reason, "max_ll");
}

#[test]
fn max_ll_upper_bound_is_inclusive() {
    let rows = vec![make_row("r0", 200, 600, 20.0, 0.5, "x = 1\n")];

    let outcome = moderate_funnel().run(rows);

    assert_eq!(outcome.kept.len(), 1);
    assert!(outcome.rejected.is_empty());
}

#[test]
fn min_max_ll_lower_bound_is_inclusive() {
    let rows = vec![
        make_row("r0", 200, 25, 20.0, 0.5, "x = 1\n"),
        make_row("r1", 200, 24, 20.0, 0.5, "x = 1\n"),
    ];

    let outcome = moderate_funnel().run(rows);

    assert_eq!(outcome.kept.len(), 1);
    assert_eq!(outcome.kept[0].orig_index, 0);
    assert_eq!(outcome.rejected[0].reason, "max_ll");
}

#[test]
fn ave_ll_lower_bound_is_exclusive() {
    // file_size keeps the estimated line count comfortably above min_lines so
    // only stage 5 can reject here.
    let rows = vec![make_row("r0", 320, 30, 16.0, 0.5, "x = 1\n")];

    let outcome = moderate_funnel().run(rows);

    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].reason, "ave_ll");
}

#[test]
fn alphanum_bounds_are_exclusive() {
    let rows = vec![
        make_row("r0", 200, 30, 20.0, 0.975, "x = 1\n"),
        make_row("r1", 200, 30, 20.0, 0.001, "x = 1\n"),
    ];

    let outcome = moderate_funnel().run(rows);

    assert_eq!(outcome.kept.len(), 0);
    assert!(outcome
        .rejected
        .iter()
        .all(|r| r.reason == "alphanum_frac"));
}

#[test]
fn file_size_cap_is_inclusive_at_the_byte_limit() {
    let at_limit = 750 * 1024;
    let rows = vec![
        make_row("r0", at_limit, 30, 20.0, 0.5, "x = 1\n"),
        make_row("r1", at_limit + 1, 30, 20.0, 0.5, "x = 1\n"),
    ];

    let outcome = moderate_funnel().run(rows);

    assert_eq!(outcome.kept.len(), 1);
    assert_eq!(outcome.kept[0].orig_index, 0);
    assert_eq!(outcome.rejected[0].reason, "file_too_large");
}

#[test]
fn zero_average_line_length_fails_min_lines_deterministically() {
    // A negative ave_ll bound lets the zero-divisor row reach stage 6.
    let config = FilterConfig {
        min_ave_ll: -1.0,
        ..FilterConfig::from_style(ConfigStyle::Moderate)
    };
    let funnel = FilterFunnel::new(build_stages(&config, Arc::new(PythonSyntaxValidator)));

    let rows = vec![make_row("r0", 200, 30, 0.0, 0.5, "x = 1\n")];
    let outcome = funnel.run(rows);

    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].reason, "min_lines");
}

#[test]
fn unparseable_content_is_tagged_python2() {
    let rows = vec![make_row("r0", 200, 30, 20.0, 0.5, "print 'hello'\n")];

    let outcome = moderate_funnel().run(rows);

    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].reason, "python2");
}

#[test]
fn small_file_rejected_as_file_too_small_under_moderate() {
    let rows = vec![make_row("r0", 40, 30, 20.0, 0.5, "x = 1\n")];

    let outcome = moderate_funnel().run(rows);

    assert_eq!(outcome.kept.len(), 0);
    assert_eq!(outcome.rejected[0].reason, "file_too_small");
}

#[test]
fn row_clearing_every_stage_is_kept() {
    let rows = vec![make_row("r0", 200, 30, 20.0, 0.5, "x=1")];

    let outcome = moderate_funnel().run(rows);

    assert_eq!(outcome.kept.len(), 1);
    assert!(outcome.rejected.is_empty());
}

#[test]
fn running_the_funnel_twice_gives_identical_outcomes() {
    let rows = vec![
        good_row("r0"),
        make_row("r1", 10, 30, 20.0, 0.5, "x = 1\n"),
        make_row("r2", 200, 30, 20.0, 0.999, "x = 1\n"),
        make_row("r3", 200, 30, 20.0, 0.5, "def f(:\n"),
    ];

    let funnel = moderate_funnel();
    let first = funnel.run(rows.clone());
    let second = funnel.run(rows);

    assert_eq!(first, second);
}

#[test]
fn empty_stage_list_keeps_everything() {
    let funnel = FilterFunnel::new(Vec::new());
    assert_eq!(funnel.stage_count(), 0);

    let outcome = funnel.run(vec![good_row("r0"), good_row("r1")]);
    assert_eq!(outcome.kept.len(), 2);
    assert!(outcome.rejected.is_empty());
}

#[test]
fn stage_list_carries_the_fixed_reason_order() {
    let config = FilterConfig::from_style(ConfigStyle::Moderate);
    let stages = build_stages(&config, Arc::new(PythonSyntaxValidator));
    let reasons: Vec<&str> = stages.iter().map(|stage| stage.reason()).collect();
    assert_eq!(
        reasons,
        vec![
            "max_ll",
            "file_too_small",
            "file_too_large",
            "alphanum_frac",
            "ave_ll",
            "min_lines",
            "python2",
        ]
    );
}
