//! Facet mappings for the content types shown in lists

use crate::filter::Listable;
use chrono::Datelike;
use labsite_cms::models::{Alumnus, FacultyMember, NewsItem, Partner, Project, Publication};

/// Push the non-empty optional fields onto `out`
fn present<'a>(out: &mut Vec<&'a str>, fields: &[&'a Option<String>]) {
    out.extend(fields.iter().copied().filter_map(Option::as_deref).filter(|f| !f.is_empty()));
}

impl Listable for Publication {
    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.title.as_str()];
        present(
            &mut text,
            &[&self.authors, &self.journal, &self.conference, &self.keywords],
        );
        text
    }

    /// Publication type (`journal`, `conference`, ...)
    fn category(&self) -> Option<&str> {
        self.kind.map(|k| k.as_str())
    }

    fn year(&self) -> Option<i32> {
        self.year
    }

    /// Research line slug
    fn taxonomy(&self) -> Option<&str> {
        self.research_line.as_ref().map(|l| l.slug.as_str())
    }
}

impl Listable for Alumnus {
    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.name.as_str()];
        present(
            &mut text,
            &[
                &self.thesis_title,
                &self.advisor,
                &self.current_position,
                &self.current_institution,
            ],
        );
        text
    }

    fn category(&self) -> Option<&str> {
        self.degree_level_name()
    }

    fn year(&self) -> Option<i32> {
        self.defense_year
    }

    fn taxonomy(&self) -> Option<&str> {
        self.sector_name()
    }
}

impl Listable for FacultyMember {
    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.name.as_str()];
        present(&mut text, &[&self.role, &self.short_bio]);
        text
    }

    fn category(&self) -> Option<&str> {
        self.role.as_deref()
    }
}

impl Listable for Project {
    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.title.as_str()];
        present(&mut text, &[&self.summary, &self.funding_agency]);
        text
    }

    fn category(&self) -> Option<&str> {
        self.status.as_deref()
    }

    fn year(&self) -> Option<i32> {
        self.start_date.map(|d| d.year())
    }
}

impl Listable for NewsItem {
    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.title.as_str()];
        present(&mut text, &[&self.excerpt]);
        text
    }

    fn category(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }

    fn year(&self) -> Option<i32> {
        self.publish_date.map(|d| d.year())
    }
}

impl Listable for Partner {
    fn search_text(&self) -> Vec<&str> {
        let mut text = vec![self.name.as_str()];
        present(&mut text, &[&self.acronym, &self.city, &self.country]);
        text
    }

    fn category(&self) -> Option<&str> {
        self.partner_type.as_ref().map(|t| t.name.as_str())
    }
}
