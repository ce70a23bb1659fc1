//! End-to-end tests over a small registration export.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use divgen_division::frame::{derive_text_values, has_column};
use divgen_division::{
    DivisionError, ReportDivision, ReportDivisionBuilder, SpecArtifactPlan, SpecDivisionLayout,
    SpecExtractOptions, extract_to_divisions, plan_from_registrations, read_registrations,
};
use polars::prelude::DataFrame;
use tempfile::TempDir;

const C_HEADER: &str = "Participant's Name: First,Participant's Name: Last,\
EMA Location Participant is From,Height (in total inches),Weight (in total lbs),Belt Level,\
Gender: Male,Gender: Female,Division Entering:: Forms,Division Entering:: Weapons,\
Division Entering:: Grappling,Division Entering:: Sparring,\
Extra Divisions:: Team Forms - 12 Years and Under Only (Bonus Division) +$10,\
Teammates Names for Team Forms,\
Extra Divisions:: Musical Weapons - All Ages (Bonus Division) +$10 (modified),Shirt Size";

const TUP_ROWS: [&str; 6] = [
    "Ana,Lee,North,60,120,White,,Female,Forms,,,,,,,M",
    "Bea,Kim,North,58,100,White,,Female,Forms,Weapons,,,Yes,Cy and Di,,S",
    "Cal,Roe,South,68,150,Blue,Male,,Forms,,,,,,,L",
    "Dan,Fox,South,55,90,Brown Belt Red Stripe,Male,,,,Grappling,Sparring,,,Yes,M",
    "Eve,Ng,East,50,80,Camo,,Female,Forms,,,,,,,S",
    "Flo,Ito,East,52,85,Yellow,,,Forms,,,,,,,S",
];

fn write_registrations(dir: &Path) -> PathBuf {
    let path = dir.join("registrations.csv");
    let mut content = String::from(C_HEADER);
    content.push('\n');
    for c_row in TUP_ROWS {
        content.push_str(c_row);
        content.push('\n');
    }
    fs::write(&path, content).expect("write csv");
    path
}

fn plan_fixture(dir: &Path) -> (SpecArtifactPlan, ReportDivision) {
    let layout = SpecDivisionLayout::default();
    let df_raw = read_registrations(&write_registrations(dir), &layout).expect("read");
    let mut report = ReportDivisionBuilder::default();
    let plan = plan_from_registrations(&df_raw, &layout, &mut report).expect("plan");
    (plan, report.build())
}

fn first_names(df: &DataFrame) -> Vec<String> {
    derive_text_values(df, "Participant's Name: First")
        .expect("names")
        .into_iter()
        .flatten()
        .collect()
}

#[test]
fn blue_male_forms_entrant_lands_only_in_blue_male_forms() {
    let tmp = TempDir::new().expect("tempdir");
    let (plan, _) = plan_fixture(tmp.path());

    let df_forms = plan.get_section("Blue_Belt_Male", "Forms").expect("forms");
    assert_eq!(first_names(df_forms), vec!["Cal"]);
    assert_eq!(
        derive_text_values(df_forms, "Gender").expect("gender"),
        vec![Some("Male".to_string())]
    );

    for (key, l_sections) in &plan.bucket_workbooks {
        for section in l_sections {
            let if_has_cal = first_names(&section.df).iter().any(|c_name| c_name == "Cal");
            let if_expected = key.file_stem() == "Blue_Belt_Male" && section.name == "Forms";
            assert_eq!(if_has_cal, if_expected, "{} / {}", key.file_stem(), section.name);
        }
    }
}

#[test]
fn lighter_white_female_precedes_heavier() {
    let tmp = TempDir::new().expect("tempdir");
    let (plan, _) = plan_fixture(tmp.path());

    let df_forms = plan.get_section("White_Belt_Female", "Forms").expect("forms");
    assert_eq!(first_names(df_forms), vec!["Bea", "Ana"]);
}

#[test]
fn teammates_only_travel_with_team_forms() {
    let tmp = TempDir::new().expect("tempdir");
    let (plan, _) = plan_fixture(tmp.path());

    let df_forms = plan.get_section("White_Belt_Female", "Forms").expect("forms");
    assert!(!has_column(df_forms, "Teammates Names for Team Forms"));
    assert!(!has_column(df_forms, "Shirt Size"));

    let df_team = plan.get_extra("Team Forms").expect("team forms");
    assert_eq!(first_names(df_team), vec!["Bea"]);
    assert_eq!(
        derive_text_values(df_team, "Teammates Names for Team Forms").expect("teammates"),
        vec![Some("Cy and Di".to_string())]
    );
}

#[test]
fn bucket_sections_cover_every_placeable_entrant() {
    let tmp = TempDir::new().expect("tempdir");
    let (plan, report) = plan_fixture(tmp.path());

    assert_eq!(report.rows_in_division("Forms"), Some(5));

    let mut set_names = BTreeSet::new();
    let mut n_rows = 0;
    for l_sections in plan.bucket_workbooks.values() {
        for section in l_sections.iter().filter(|section| section.name == "Forms") {
            n_rows += section.df.height();
            set_names.extend(first_names(&section.df));
        }
    }
    assert_eq!(n_rows, 3);
    assert_eq!(
        set_names,
        BTreeSet::from(["Ana".to_string(), "Bea".to_string(), "Cal".to_string()])
    );
    assert!(
        plan.warnings
            .iter()
            .any(|c_warning| c_warning.starts_with("Forms: 2 row(s)"))
    );
}

#[test]
fn bucket_sections_hold_a_single_gender() {
    let tmp = TempDir::new().expect("tempdir");
    let (plan, _) = plan_fixture(tmp.path());

    assert_eq!(plan.bucket_workbooks.len(), 18);
    for (key, l_sections) in &plan.bucket_workbooks {
        assert_eq!(l_sections.len(), 4, "{}", key.file_stem());
        for section in l_sections {
            let l_genders = derive_text_values(&section.df, "Gender").expect("gender");
            assert!(
                l_genders
                    .iter()
                    .all(|gender| gender.as_deref() == Some(key.gender.as_str()))
            );
        }
    }

    let df_female = plan.get_section("White_Belt_Female", "Forms").expect("female");
    let df_male = plan.get_section("White_Belt_Male", "Forms").expect("male");
    assert_eq!(df_female.height() + df_male.height(), 2);
}

#[test]
fn missing_gender_falls_back_to_sentinel_and_is_reported() {
    let tmp = TempDir::new().expect("tempdir");
    let (plan, report) = plan_fixture(tmp.path());

    for c_stem in ["Yellow_Belt_Female", "Yellow_Belt_Male"] {
        let df_forms = plan.get_section(c_stem, "Forms").expect("forms");
        assert_eq!(df_forms.height(), 0, "{c_stem}");
    }
    assert!(
        report
            .warnings
            .iter()
            .any(|c_warning| c_warning.contains("gender other than Female or Male"))
    );
    assert!(
        report
            .warnings
            .iter()
            .any(|c_warning| c_warning.contains("unknown belt level"))
    );
}

#[test]
fn planning_twice_yields_identical_sections() {
    let tmp = TempDir::new().expect("tempdir");
    let (plan_a, _) = plan_fixture(tmp.path());
    let (plan_b, _) = plan_fixture(tmp.path());

    assert_eq!(plan_a.artifact_count(), plan_b.artifact_count());
    let iter_pairs = plan_a
        .bucket_workbooks
        .iter()
        .zip(&plan_b.bucket_workbooks);
    for ((key_a, l_a), (key_b, l_b)) in iter_pairs {
        assert_eq!(key_a, key_b);
        for (section_a, section_b) in l_a.iter().zip(l_b) {
            assert_eq!(section_a.name, section_b.name);
            assert!(section_a.df.equals_missing(&section_b.df));
        }
    }
}

#[test]
fn extract_writes_twenty_workbooks() {
    let tmp = TempDir::new().expect("tempdir");
    let path_csv = write_registrations(tmp.path());
    let options = SpecExtractOptions {
        dir_out_root: tmp.path().to_path_buf(),
        if_dry_run: false,
    };

    let report = extract_to_divisions(&path_csv, &SpecDivisionLayout::default(), &options)
        .expect("extract");

    let dir_out = report.dir_out.clone().expect("output dir");
    assert!(dir_out.is_absolute());
    assert!(
        dir_out
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with("output_"))
    );
    assert_eq!(report.cnt_rows_read, 6);
    assert_eq!(report.cnt_artifacts_planned, 20);
    assert_eq!(report.cnt_artifacts_written, 20);

    let set_files: BTreeSet<String> = fs::read_dir(&dir_out)
        .expect("read output dir")
        .map(|entry| entry.expect("entry").file_name().to_string_lossy().to_string())
        .collect();
    assert_eq!(set_files.len(), 20);
    assert!(set_files.contains("Team Forms.xlsx"));
    assert!(set_files.contains("Musical Weapons.xlsx"));
    assert!(set_files.contains("Brown_Belt_Male.xlsx"));
    assert!(set_files.contains("Black_Belt_Female.xlsx"));

    let set_reported: BTreeSet<String> = report
        .files_out()
        .iter()
        .filter_map(|path| path.file_name())
        .map(|name| name.to_string_lossy().to_string())
        .collect();
    assert_eq!(set_reported, set_files);
}

#[test]
fn extract_records_sheet_layout_of_every_workbook() {
    let tmp = TempDir::new().expect("tempdir");
    let path_csv = write_registrations(tmp.path());
    let options = SpecExtractOptions {
        dir_out_root: tmp.path().to_path_buf(),
        if_dry_run: false,
    };

    let report = extract_to_divisions(&path_csv, &SpecDivisionLayout::default(), &options)
        .expect("extract");
    assert_eq!(report.artifacts_out.len(), 20);

    for artifact in &report.artifacts_out[..18] {
        assert!(artifact.path.is_file(), "{}", artifact.path.display());
        assert_eq!(
            artifact.sheet_names(),
            vec!["Forms", "Weapons", "Grappling", "Sparring"],
            "{}",
            artifact.path.display()
        );
        for sheet in &artifact.sheets {
            assert!(!sheet.columns.iter().any(|c_col| c_col == "Teammates Names for Team Forms"));
            assert!(sheet.columns.iter().any(|c_col| c_col == "Gender"));
        }
    }

    let white_female = report
        .get_artifact("White_Belt_Female.xlsx")
        .expect("white female");
    let l_rows: Vec<usize> = white_female.sheets.iter().map(|sheet| sheet.cnt_rows).collect();
    assert_eq!(l_rows, vec![2, 1, 0, 0]);

    let brown_male = report.get_artifact("Brown_Belt_Male.xlsx").expect("brown male");
    let l_rows: Vec<usize> = brown_male.sheets.iter().map(|sheet| sheet.cnt_rows).collect();
    assert_eq!(l_rows, vec![0, 0, 1, 1]);

    let n_rows_rostered: usize = report.artifacts_out[..18]
        .iter()
        .flat_map(|artifact| &artifact.sheets)
        .map(|sheet| sheet.cnt_rows)
        .sum();
    // Eve's belt matches no bucket and Flo has no gender.
    assert_eq!(n_rows_rostered, 6);

    let team_forms = report.get_artifact("Team Forms.xlsx").expect("team forms");
    assert_eq!(team_forms.sheet_names(), vec!["Team Forms"]);
    assert_eq!(team_forms.sheets[0].cnt_rows, 1);
    assert!(
        team_forms.sheets[0]
            .columns
            .iter()
            .any(|c_col| c_col == "Teammates Names for Team Forms")
    );

    let musical = report.get_artifact("Musical Weapons.xlsx").expect("musical");
    assert_eq!(musical.sheet_names(), vec!["Musical Weapons"]);
    assert_eq!(musical.sheets[0].cnt_rows, 1);
}

#[test]
fn late_fractional_weight_still_extracts() {
    let tmp = TempDir::new().expect("tempdir");
    let path_csv = tmp.path().join("registrations.csv");
    let mut content = String::from(C_HEADER);
    content.push('\n');
    for n_idx in 0..150 {
        content.push_str(&format!(
            "Kid{n_idx},Lee,North,50,{},White,,Female,Forms,,,,,,,M\n",
            70 + n_idx % 30
        ));
    }
    content.push_str("Zoe,Lee,North,50,120.5,White,,Female,Forms,,,,,,,M\n");
    fs::write(&path_csv, content).expect("write csv");
    let options = SpecExtractOptions {
        dir_out_root: tmp.path().to_path_buf(),
        if_dry_run: true,
    };

    let report = extract_to_divisions(&path_csv, &SpecDivisionLayout::default(), &options)
        .expect("extract");
    assert_eq!(report.cnt_rows_read, 151);
    assert_eq!(report.rows_in_division("Forms"), Some(151));
}

#[test]
fn whitespace_only_membership_counts_as_entered() {
    let tmp = TempDir::new().expect("tempdir");
    let path_csv = tmp.path().join("registrations.csv");
    let content = format!(
        "{C_HEADER}\n\
         Ana,Lee,North,60,120,White,,Female,Forms,,,,,,,M\n\
         Gus,Lee,North,60,110,White,,Female,\" \",,,,,,,M\n"
    );
    fs::write(&path_csv, content).expect("write csv");
    let options = SpecExtractOptions {
        dir_out_root: tmp.path().to_path_buf(),
        if_dry_run: true,
    };

    let report = extract_to_divisions(&path_csv, &SpecDivisionLayout::default(), &options)
        .expect("extract");
    assert_eq!(report.rows_in_division("Forms"), Some(2));
}

#[test]
fn dry_run_leaves_filesystem_untouched() {
    let tmp = TempDir::new().expect("tempdir");
    let path_csv = write_registrations(tmp.path());
    let options = SpecExtractOptions {
        dir_out_root: tmp.path().join("out"),
        if_dry_run: true,
    };

    let report = extract_to_divisions(&path_csv, &SpecDivisionLayout::default(), &options)
        .expect("dry run");
    assert!(report.dir_out.is_none());
    assert_eq!(report.cnt_artifacts_planned, 20);
    assert_eq!(report.cnt_artifacts_written, 0);
    assert!(!tmp.path().join("out").exists());
}

#[test]
fn missing_source_is_fatal() {
    let tmp = TempDir::new().expect("tempdir");
    let err = extract_to_divisions(
        &tmp.path().join("absent.csv"),
        &SpecDivisionLayout::default(),
        &SpecExtractOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DivisionError::SourceNotFound { .. }));
}

#[test]
fn source_without_belt_column_is_fatal() {
    let tmp = TempDir::new().expect("tempdir");
    let path_csv = tmp.path().join("no_belt.csv");
    fs::write(&path_csv, "Gender: Male,Gender: Female\nMale,\n").expect("write csv");

    let err = extract_to_divisions(
        &path_csv,
        &SpecDivisionLayout::default(),
        &SpecExtractOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        DivisionError::MissingColumn { ref column, .. } if column == "Belt Level"
    ));
}

#[test]
fn invalid_layout_is_rejected_before_reading() {
    let tmp = TempDir::new().expect("tempdir");
    let mut layout = SpecDivisionLayout::default();
    layout.belt_buckets.push("Brown Belt".to_string());

    let err = extract_to_divisions(
        &tmp.path().join("absent.csv"),
        &layout,
        &SpecExtractOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, DivisionError::AmbiguousBeltBucket { .. }));
}
