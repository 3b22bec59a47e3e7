//! CSV and BibTeX export of list contents

use labsite_cms::models::{Alumnus, Publication, PublicationType};
use std::borrow::Cow;

/// One CSV column: header plus how to read it from a record
pub struct Column<T> {
    pub header: &'static str,
    pub value: fn(&T) -> String,
}

impl<T> Column<T> {
    pub const fn new(header: &'static str, value: fn(&T) -> String) -> Self {
        Self { header, value }
    }
}

/// Header row plus one row per record, joined with `\n`
pub fn to_csv<'a, T, I>(records: I, columns: &[Column<T>]) -> String
where
    I: IntoIterator<Item = &'a T>,
    T: 'a,
{
    let header = columns
        .iter()
        .map(|c| escape_field(c.header))
        .collect::<Vec<_>>()
        .join(",");

    let mut rows = vec![header];
    for record in records {
        let row = columns
            .iter()
            .map(|c| escape_field(&(c.value)(record)).into_owned())
            .collect::<Vec<_>>()
            .join(",");
        rows.push(row);
    }

    rows.join("\n")
}

/// Quote fields containing a comma, quote or line break
fn escape_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

pub fn alumni_columns() -> Vec<Column<Alumnus>> {
    vec![
        Column::new("Name", |a: &Alumnus| a.name.clone()),
        Column::new("Degree", |a: &Alumnus| a.degree_level_name().unwrap_or_default().to_string()),
        Column::new("Thesis", |a: &Alumnus| text(&a.thesis_title)),
        Column::new("Year", |a: &Alumnus| number(a.defense_year)),
        Column::new("Advisor", |a: &Alumnus| text(&a.advisor)),
        Column::new("Position", |a: &Alumnus| text(&a.current_position)),
        Column::new("Institution", |a: &Alumnus| text(&a.current_institution)),
        Column::new("Sector", |a: &Alumnus| a.sector_name().unwrap_or_default().to_string()),
    ]
}

pub fn publication_columns() -> Vec<Column<Publication>> {
    vec![
        Column::new("Title", |p: &Publication| p.title.clone()),
        Column::new("Authors", |p: &Publication| text(&p.authors)),
        Column::new("Year", |p: &Publication| number(p.year)),
        Column::new("Type", |p: &Publication| p.kind_or_other().label().to_string()),
        Column::new("Venue", |p: &Publication| p.venue().unwrap_or_default().to_string()),
        Column::new("DOI", |p: &Publication| text(&p.doi)),
        Column::new("Research Line", |p: &Publication| {
            p.research_line.as_ref().map(|l| l.title.clone()).unwrap_or_default()
        }),
    ]
}

// ============================================================================
// BibTeX
// ============================================================================

/// Entries separated by a blank line
pub fn to_bibtex<'a, I>(publications: I) -> String
where
    I: IntoIterator<Item = &'a Publication>,
{
    publications
        .into_iter()
        .map(bibtex_entry)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Stored BibTeX when the record has one, otherwise a generated entry
pub fn bibtex_entry(publication: &Publication) -> String {
    if let Some(stored) = publication.bibtex.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        return stored.to_string();
    }

    let kind = publication.kind_or_other();
    let mut fields: Vec<(&str, String)> = vec![("title", publication.title.clone())];

    if let Some(authors) = publication.authors.as_deref().filter(|a| !a.trim().is_empty()) {
        let authors = split_authors(authors).collect::<Vec<_>>().join(" and ");
        fields.push(("author", authors));
    }
    if let Some(year) = publication.year {
        fields.push(("year", year.to_string()));
    }
    if let Some(venue) = publication.venue() {
        let field = match kind {
            PublicationType::Journal => "journal",
            _ => "booktitle",
        };
        fields.push((field, venue.to_string()));
    }

    let optional = [
        ("volume", &publication.volume),
        ("number", &publication.issue),
        ("pages", &publication.pages),
        ("publisher", &publication.publisher),
        ("doi", &publication.doi),
        ("url", &publication.url),
    ];
    for (name, value) in optional {
        if let Some(value) = value.as_deref().filter(|v| !v.trim().is_empty()) {
            fields.push((name, value.trim().to_string()));
        }
    }

    let body = fields
        .iter()
        .map(|(name, value)| format!("  {} = {{{}}}", name, value))
        .collect::<Vec<_>>()
        .join(",\n");

    format!("@{}{{{},\n{}\n}}", entry_type(kind), citation_key(publication), body)
}

fn entry_type(kind: PublicationType) -> &'static str {
    match kind {
        PublicationType::Journal => "article",
        PublicationType::Conference => "inproceedings",
        PublicationType::Chapter => "incollection",
        PublicationType::Book => "book",
        PublicationType::Thesis => "phdthesis",
        PublicationType::Other => "misc",
    }
}

/// `Souza, A.; Lima, B.` or `A. Souza and B. Lima`
fn split_authors(authors: &str) -> impl Iterator<Item = &str> {
    authors
        .split(';')
        .flat_map(|part| part.split(" and "))
        .map(str::trim)
        .filter(|a| !a.is_empty())
}

/// First author surname + year + first title word, e.g. `souza2024deep`
pub fn citation_key(publication: &Publication) -> String {
    let surname = publication
        .authors
        .as_deref()
        .and_then(|a| split_authors(a).next())
        .map(|first| match first.split_once(',') {
            Some((surname, _)) => surname,
            None => first.split_whitespace().last().unwrap_or(first),
        })
        .map(sanitize_key_part)
        .unwrap_or_default();

    let year = publication.year.map(|y| y.to_string()).unwrap_or_default();

    let word = publication
        .title
        .split_whitespace()
        .map(sanitize_key_part)
        .find(|w| w.len() > 3)
        .unwrap_or_default();

    let key = format!("{}{}{}", surname, year, word);
    if key.is_empty() {
        format!("pub{}", publication.id)
    } else {
        key
    }
}

/// Lowercased ASCII letters and digits only
fn sanitize_key_part(raw: &str) -> String {
    raw.to_lowercase().chars().filter(char::is_ascii_alphanumeric).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alumnus(name: &str, institution: &str) -> Alumnus {
        serde_json::from_value(json!({
            "id": 1,
            "name": name,
            "defenseYear": 2021,
            "currentInstitution": institution,
            "degreeLevel": { "id": 1, "name": "PhD" }
        }))
        .unwrap()
    }

    fn publication(value: serde_json::Value) -> Publication {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_alumni_csv_rows_and_quoting() {
        let alumni = vec![
            alumnus("Ana Souza", "UFPE"),
            alumnus("Bruno Lima", "Recife, PE"),
            alumnus("Carla \"Cacá\" Dias", "USP"),
            alumnus("Davi Melo", "Petrobras"),
            alumnus("Eva Rocha", "Google"),
        ];

        let csv = to_csv(&alumni, &alumni_columns());
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Name,Degree,Thesis,Year,Advisor,Position,Institution,Sector");
        assert_eq!(lines[1], "Ana Souza,PhD,,2021,,,UFPE,");
        assert!(lines[2].contains("\"Recife, PE\""));
        assert!(lines[3].starts_with("\"Carla \"\"Cacá\"\" Dias\""));
    }

    #[test]
    fn test_escape_field() {
        assert_eq!(escape_field("plain"), "plain");
        assert_eq!(escape_field("a,b"), "\"a,b\"");
        assert_eq!(escape_field("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(escape_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_stored_bibtex_wins() {
        let p = publication(json!({
            "id": 1, "title": "T", "slug": "t",
            "bibtex": "  @article{stored, title={T}}  "
        }));
        assert_eq!(bibtex_entry(&p), "@article{stored, title={T}}");
    }

    #[test]
    fn test_generated_bibtex() {
        let p = publication(json!({
            "id": 9, "title": "Deep Learning for Power Grids", "slug": "dl",
            "authors": "Souza, A.; Lima, B.", "year": 2024, "type": "journal",
            "journal": "Energy Reports", "doi": "10.1/xyz"
        }));

        let entry = bibtex_entry(&p);

        assert!(entry.starts_with("@article{souza2024deep,\n"));
        assert!(entry.contains("  author = {Souza, A. and Lima, B.}"));
        assert!(entry.contains("  journal = {Energy Reports}"));
        assert!(entry.contains("  doi = {10.1/xyz}"));
        assert!(entry.ends_with("\n}"));
    }

    #[test]
    fn test_citation_key_fallbacks() {
        let conference = publication(json!({
            "id": 3, "title": "On Graphs", "slug": "g",
            "authors": "João da Silva and M. Costa", "year": 2020, "type": "conference"
        }));
        assert_eq!(citation_key(&conference), "silva2020graphs");

        let bare = publication(json!({ "id": 4, "title": "", "slug": "x" }));
        assert_eq!(citation_key(&bare), "pub4");
    }

    #[test]
    fn test_key_parts_keep_ascii_alphanumerics() {
        assert_eq!(sanitize_key_part("Müller-Lüdenscheidt"), "mllerldenscheidt");
        assert_eq!(sanitize_key_part("O'Brien2"), "obrien2");
        assert_eq!(sanitize_key_part("--"), "");
    }
}
