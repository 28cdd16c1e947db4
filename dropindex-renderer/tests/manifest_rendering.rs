use dropindex_core::{
    Category, FileEntry, Group, HierarchyShape, Manifest, ManifestSettings,
};
use dropindex_renderer::{DocumentSettings, ManifestRenderer};
use rstest::rstest;
use tempfile::TempDir;

fn doc() -> DocumentSettings {
    DocumentSettings::from(&ManifestSettings::new("/srv/HOSPITAL"))
}

fn files(names: &[&str]) -> Vec<FileEntry> {
    names.iter().map(|n| FileEntry::from(*n)).collect()
}

/// `URGENTE/u1.wav`, `CARDIO/{DrSmith/a.wav, DrJones/b.wav}`, `NEURO/DrLee/c.wav`,
/// with the urgent folder enumerated last.
fn hospital() -> Manifest {
    let mut m = Manifest::new(HierarchyShape::Nested);
    m.push_category(Category::grouped(
        "CARDIO",
        vec![
            Group::new("DrSmith", files(&["a.wav"])),
            Group::new("DrJones", files(&["b.wav"])),
        ],
    ));
    m.push_category(Category::grouped(
        "NEURO",
        vec![Group::new("DrLee", files(&["c.wav"]))],
    ));
    m.push_category(Category::urgent("URGENTE", files(&["u1.wav"])));
    m
}

fn position(haystack: &str, needle: &str) -> usize {
    haystack
        .find(needle)
        .unwrap_or_else(|| panic!("'{needle}' missing from document:\n{haystack}"))
}

// ---------------------------------------------------------------------------
// Ordering and nesting
// ---------------------------------------------------------------------------

#[test]
fn hospital_scenario_renders_in_expected_order() {
    let html = ManifestRenderer::new().unwrap().render(&hospital(), &doc()).unwrap();

    let expected = [
        "<h2 class='exam-type'>URGENTE</h2>",
        "<li>u1.wav</li>",
        "<h2 class='exam-type'>Exam Type: CARDIO</h2>",
        "<h3 class='doctor'>Doctor: DrSmith</h3>",
        "<li>a.wav</li>",
        "<h3 class='doctor'>Doctor: DrJones</h3>",
        "<li>b.wav</li>",
        "<h2 class='exam-type'>Exam Type: NEURO</h2>",
        "<h3 class='doctor'>Doctor: DrLee</h3>",
        "<li>c.wav</li>",
    ];
    let positions: Vec<usize> = expected.iter().map(|n| position(&html, n)).collect();
    assert!(
        positions.windows(2).all(|w| w[0] < w[1]),
        "sections out of order:\n{html}"
    );
}

#[rstest]
#[case(0)]
#[case(1)]
#[case(2)]
fn urgent_section_precedes_all_others(#[case] urgent_at: usize) {
    let mut names = vec!["B", "A"];
    names.insert(urgent_at, "URGENTE");
    let mut m = Manifest::new(HierarchyShape::Flat);
    for name in names {
        if name == "URGENTE" {
            m.push_category(Category::urgent(name, files(&["u.wav"])));
        } else {
            m.push_category(Category::flat(name, files(&["f.wav"])));
        }
    }

    let html = ManifestRenderer::new().unwrap().render(&m, &doc()).unwrap();
    let urgent = position(&html, ">URGENTE</h2>");
    assert!(urgent < position(&html, "Doctor: A</h2>"));
    assert!(urgent < position(&html, "Doctor: B</h2>"));
    assert!(
        position(&html, "Doctor: B</h2>") < position(&html, "Doctor: A</h2>"),
        "non-urgent sections keep model order"
    );
}

#[test]
fn flat_shape_has_no_group_level() {
    let mut m = Manifest::new(HierarchyShape::Flat);
    m.push_category(Category::flat("G", files(&["f.txt"])));
    let html = ManifestRenderer::new().unwrap().render(&m, &doc()).unwrap();
    assert!(html.contains("<h2 class='exam-type'>Doctor: G</h2>"));
    assert!(!html.contains("<h3"));
    assert_eq!(html.matches("<li>f.txt</li>").count(), 1);
}

#[test]
fn nested_file_rendered_exactly_once() {
    let mut m = Manifest::new(HierarchyShape::Nested);
    m.push_category(Category::grouped("A", vec![Group::new("B", files(&["f.txt"]))]));
    let html = ManifestRenderer::new().unwrap().render(&m, &doc()).unwrap();
    assert_eq!(html.matches("<li>f.txt</li>").count(), 1);
    assert!(position(&html, "Exam Type: A") < position(&html, "Doctor: B"));
    assert!(position(&html, "Doctor: B") < position(&html, "<li>f.txt</li>"));
}

// ---------------------------------------------------------------------------
// Determinism and settings
// ---------------------------------------------------------------------------

#[test]
fn rendering_is_byte_identical_across_calls() {
    let renderer = ManifestRenderer::new().unwrap();
    let first = renderer.render(&hospital(), &doc()).unwrap();
    let second = renderer.render(&hospital(), &doc()).unwrap();
    assert_eq!(first, second);

    let fresh = ManifestRenderer::new().unwrap().render(&hospital(), &doc()).unwrap();
    assert_eq!(first, fresh);
}

#[test]
fn reload_interval_and_labels_are_configurable() {
    let mut settings = ManifestSettings::new("/srv/CER");
    settings.interval_secs = 30;
    settings.title = "CER Audio Files".to_string();
    settings.category_label = "Exame".to_string();
    settings.group_label = "Médico".to_string();

    let html = ManifestRenderer::new()
        .unwrap()
        .render(&hospital(), &DocumentSettings::from(&settings))
        .unwrap();
    assert!(html.contains("<meta http-equiv='refresh' content='30'>"));
    assert!(html.contains("<title>CER Audio Files</title>"));
    assert!(html.contains("Exame: CARDIO"));
    assert!(html.contains("Médico: DrSmith"));
}

#[test]
fn user_template_overrides_embedded_default() {
    let dir = TempDir::new().unwrap();
    let tpl_dir = dir.path().join("manifest");
    std::fs::create_dir_all(&tpl_dir).unwrap();
    std::fs::write(
        tpl_dir.join("index.html.tera"),
        "{% for s in sections %}[{{ s.name }}]{% endfor %}",
    )
    .unwrap();

    let renderer = ManifestRenderer::with_template_dir(Some(dir.path())).unwrap();
    let out = renderer.render(&hospital(), &doc()).unwrap();
    assert_eq!(out, "[URGENTE][CARDIO][NEURO]");
}

#[test]
fn missing_template_dir_falls_back_to_embedded() {
    let dir = TempDir::new().unwrap();
    let renderer = ManifestRenderer::with_template_dir(Some(&dir.path().join("absent"))).unwrap();
    let html = renderer.render(&hospital(), &doc()).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
}

#[test]
fn broken_user_template_is_reported() {
    let dir = TempDir::new().unwrap();
    let tpl_dir = dir.path().join("manifest");
    std::fs::create_dir_all(&tpl_dir).unwrap();
    std::fs::write(tpl_dir.join("index.html.tera"), "{% for s in sections %}").unwrap();

    assert!(ManifestRenderer::with_template_dir(Some(dir.path())).is_err());
}
