/**
 * Derived Views
 * Read-only aggregates composed from already-fetched collections and
 * consumed directly by the frontend. All single-pass, stateless
 * transforms.
 */
use serde::Serialize;

use crate::content::blog::{BlogPost, BlogSeries};
use crate::content::experience::Experience;
use crate::content::profile::{SocialLink, UsesItem};
use crate::content::project::Project;
use crate::content::reading;
use crate::content::resolve;
use crate::content::taxonomy::{Category, CurrentTechStack, Technology};

/// Technologies grouped under their category's display name, falling back
/// to the raw category identifier when the category cannot be resolved.
/// Groups appear in first-seen order; technologies keep source order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TechnologyGroup {
    pub category: String,
    pub technologies: Vec<Technology>,
}

pub fn technologies_by_category(
    technologies: &[Technology],
    categories: &[Category],
) -> Vec<TechnologyGroup> {
    let names = resolve::name_lookup(categories, |c| &c.id, |c| &c.name);

    let mut groups: Vec<TechnologyGroup> = Vec::new();
    for tech in technologies {
        let key = names
            .get(&tech.category_id)
            .cloned()
            .unwrap_or_else(|| tech.category_id.clone());

        match groups.iter_mut().find(|g| g.category == key) {
            Some(group) => group.technologies.push(tech.clone()),
            None => groups.push(TechnologyGroup {
                category: key,
                technologies: vec![tech.clone()],
            }),
        }
    }
    groups
}

/// A current-tech-stack record with its category and technologies inlined.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StackSection {
    #[serde(flatten)]
    pub stack: CurrentTechStack,
    pub category: Category,
    pub technologies: Vec<Technology>,
}

/// Denormalized home tech-stack view. Records whose category fails to
/// resolve, or whose technology list resolves to nothing, are excluded
/// outright; the survivors are sorted ascending by priority.
pub fn current_stack_details(
    stack: &[CurrentTechStack],
    categories: &[Category],
    technologies: &[Technology],
) -> Vec<StackSection> {
    let category_lookup = resolve::object_lookup(categories, |c| &c.id);
    let technology_lookup = resolve::object_lookup(technologies, |t| &t.id);

    let mut sections: Vec<StackSection> = stack
        .iter()
        .filter_map(|entry| {
            let category = category_lookup.get(&entry.category_id)?.clone();
            let technologies = resolve::resolve_objects(&entry.technology_ids, &technology_lookup);
            if technologies.is_empty() {
                return None;
            }
            Some(StackSection {
                stack: entry.clone(),
                category,
                technologies,
            })
        })
        .collect();

    resolve::sort_by_priority(&mut sections, |s| s.stack.priority);
    sections
}

/// Posts belonging to a series, ascending by position within the series.
pub fn posts_in_series(posts: &[BlogPost], series_id: &str) -> Vec<BlogPost> {
    let mut in_series: Vec<BlogPost> = posts
        .iter()
        .filter(|p| p.series_id == series_id)
        .cloned()
        .collect();
    resolve::sort_by_priority(&mut in_series, |p| p.series_position);
    in_series
}

/// Total reading time of a series in minutes, summing each post's parsed
/// estimate.
pub fn series_reading_minutes(posts: &[BlogPost]) -> i64 {
    posts
        .iter()
        .map(|p| reading::parse_reading_minutes(&p.reading_time))
        .sum()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesWithPosts {
    #[serde(flatten)]
    pub series: BlogSeries,
    pub posts: Vec<BlogPost>,
    pub total_reading_minutes: i64,
}

pub fn series_with_posts(series: &BlogSeries, posts: &[BlogPost]) -> SeriesWithPosts {
    let posts = posts_in_series(posts, &series.id);
    let total_reading_minutes = series_reading_minutes(&posts);
    SeriesWithPosts {
        series: series.clone(),
        posts,
        total_reading_minutes,
    }
}

/// Related/next-read navigation for a post. Related posts resolve by id
/// with unresolved references dropped; the recommended next read resolves
/// to `None` when its target is gone.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostNavigation {
    pub related: Vec<BlogPost>,
    pub recommended_next: Option<BlogPost>,
}

pub fn post_navigation(post: &BlogPost, all_posts: &[BlogPost]) -> PostNavigation {
    let lookup = resolve::object_lookup(all_posts, |p| &p.id);
    let related = resolve::resolve_objects(&post.related_post_ids, &lookup);
    let recommended_next = if post.recommended_next_read_id.is_empty() {
        None
    } else {
        lookup.get(&post.recommended_next_read_id).cloned()
    };
    PostNavigation {
        related,
        recommended_next,
    }
}

/// An experience with its reference arrays resolved to display names as
/// sibling fields. Unresolved slots keep the raw identifier.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceView {
    #[serde(flatten)]
    pub experience: Experience,
    pub category_names: Vec<String>,
    pub technology_names: Vec<String>,
}

pub fn experiences_with_names(
    experiences: &[Experience],
    categories: &[Category],
    technologies: &[Technology],
) -> Vec<ExperienceView> {
    let category_names = resolve::name_lookup(categories, |c| &c.id, |c| &c.name);
    let technology_names = resolve::name_lookup(technologies, |t| &t.id, |t| &t.name);

    experiences
        .iter()
        .map(|experience| ExperienceView {
            category_names: resolve::resolve_names(&experience.category_ids, &category_names),
            technology_names: resolve::resolve_names(&experience.technology_ids, &technology_names),
            experience: experience.clone(),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectView {
    #[serde(flatten)]
    pub project: Project,
    pub category_names: Vec<String>,
    pub technology_names: Vec<String>,
}

pub fn projects_with_names(
    projects: &[Project],
    categories: &[Category],
    technologies: &[Technology],
) -> Vec<ProjectView> {
    let category_names = resolve::name_lookup(categories, |c| &c.id, |c| &c.name);
    let technology_names = resolve::name_lookup(technologies, |t| &t.id, |t| &t.name);

    projects
        .iter()
        .map(|project| ProjectView {
            category_names: resolve::resolve_names(&project.category_ids, &category_names),
            technology_names: resolve::resolve_names(&project.technology_ids, &technology_names),
            project: project.clone(),
        })
        .collect()
}

/// Social links filtered to visible entries, ascending by priority.
pub fn visible_social_links(links: &[SocialLink]) -> Vec<SocialLink> {
    let mut visible: Vec<SocialLink> = links.iter().filter(|l| l.is_visible).cloned().collect();
    resolve::sort_by_priority(&mut visible, |l| l.priority);
    visible
}

/// All uses items, ascending by priority.
pub fn uses_sorted(items: &[UsesItem]) -> Vec<UsesItem> {
    let mut sorted = items.to_vec();
    resolve::sort_by_priority(&mut sorted, |i| i.priority);
    sorted
}

/// Favorite uses items only, ascending by priority.
pub fn favorite_uses(items: &[UsesItem]) -> Vec<UsesItem> {
    let mut favorites: Vec<UsesItem> = items.iter().filter(|i| i.is_favorite).cloned().collect();
    resolve::sort_by_priority(&mut favorites, |i| i.priority);
    favorites
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::store::Document;
    use chrono::Utc;
    use serde_json::json;

    fn doc(id: &str, data: serde_json::Value) -> Document {
        Document {
            id: id.to_string(),
            data,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn category(id: &str, name: &str) -> Category {
        Category::from_doc(&doc(id, json!({ "name": name })))
    }

    fn technology(id: &str, name: &str, category_id: &str) -> Technology {
        Technology::from_doc(&doc(id, json!({ "name": name, "category_id": category_id })))
    }

    fn stack_entry(id: &str, category_id: &str, tech_ids: &[&str], priority: i64) -> CurrentTechStack {
        CurrentTechStack::from_doc(&doc(
            id,
            json!({
                "name": id,
                "category_id": category_id,
                "technology_ids": tech_ids,
                "priority": priority
            }),
        ))
    }

    fn post(id: &str, series_id: &str, position: i64, reading_time: &str) -> BlogPost {
        BlogPost::from_doc(&doc(
            id,
            json!({
                "title": id,
                "slug": id,
                "series_id": series_id,
                "series_position": position,
                "reading_time": reading_time
            }),
        ))
    }

    #[test]
    fn test_group_by_resolved_category_name() {
        let categories = vec![category("c1", "Backend"), category("c2", "Frontend")];
        let technologies = vec![
            technology("t1", "Axum", "c1"),
            technology("t2", "React", "c2"),
            technology("t3", "sqlx", "c1"),
        ];

        let groups = technologies_by_category(&technologies, &categories);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].category, "Backend");
        assert_eq!(groups[0].technologies.len(), 2);
        assert_eq!(groups[0].technologies[1].name, "sqlx");
        assert_eq!(groups[1].category, "Frontend");
    }

    #[test]
    fn test_group_falls_back_to_raw_id_without_categories() {
        // Degraded upstream: the categories fetch failed and was recovered
        // as an empty collection.
        let technologies = vec![technology("t1", "Axum", "c1")];
        let groups = technologies_by_category(&technologies, &[]);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, "c1");
    }

    #[test]
    fn test_stack_details_excludes_unresolvable_entries() {
        let categories = vec![category("c1", "Backend")];
        let technologies = vec![technology("t1", "Axum", "c1")];
        let stack = vec![
            stack_entry("good", "c1", &["t1"], 2),
            stack_entry("no-category", "ghost", &["t1"], 0),
            stack_entry("no-techs", "c1", &["ghost"], 1),
        ];

        let sections = current_stack_details(&stack, &categories, &technologies);
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].stack.id, "good");
        assert_eq!(sections[0].category.name, "Backend");
        assert_eq!(sections[0].technologies[0].name, "Axum");
    }

    #[test]
    fn test_stack_details_sorted_by_priority() {
        let categories = vec![category("c1", "Backend")];
        let technologies = vec![technology("t1", "Axum", "c1")];
        let stack = vec![
            stack_entry("later", "c1", &["t1"], 5),
            stack_entry("first", "c1", &["t1"], 1),
        ];

        let sections = current_stack_details(&stack, &categories, &technologies);
        assert_eq!(sections[0].stack.id, "first");
        assert_eq!(sections[1].stack.id, "later");
    }

    #[test]
    fn test_series_posts_ordered_by_position() {
        let posts = vec![
            post("p3", "s1", 3, "4 min read"),
            post("p1", "s1", 1, "6 min read"),
            post("other", "s2", 1, "9 min read"),
            post("p2", "s1", 2, "not parsable"),
        ];

        let ordered = posts_in_series(&posts, "s1");
        let ids: Vec<&str> = ordered.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
        // 6 + 0 + 4; the unparsable estimate contributes zero
        assert_eq!(series_reading_minutes(&ordered), 10);
    }

    #[test]
    fn test_post_navigation_resolution() {
        let mut target = post("p1", "", 0, "1 min read");
        target.related_post_ids = vec!["p2".into(), "ghost".into()];
        target.recommended_next_read_id = "p3".into();

        let all = vec![
            target.clone(),
            post("p2", "", 0, "1 min read"),
            post("p3", "", 0, "1 min read"),
        ];

        let nav = post_navigation(&target, &all);
        assert_eq!(nav.related.len(), 1);
        assert_eq!(nav.related[0].id, "p2");
        assert_eq!(nav.recommended_next.as_ref().unwrap().id, "p3");

        let mut dangling = target.clone();
        dangling.recommended_next_read_id = "ghost".into();
        assert!(post_navigation(&dangling, &all).recommended_next.is_none());
    }

    #[test]
    fn test_experience_names_keep_unresolved_slots() {
        let categories = vec![category("c1", "Backend")];
        let technologies = vec![technology("t1", "Axum", "c1")];
        let experience = Experience::from_doc(&doc(
            "e1",
            json!({
                "title": "Engineer",
                "category_ids": ["c1", "ghost"],
                "technology_ids": ["t1"]
            }),
        ));

        let views = experiences_with_names(&[experience], &categories, &technologies);
        assert_eq!(views[0].category_names, vec!["Backend", "ghost"]);
        assert_eq!(views[0].technology_names, vec!["Axum"]);
    }

    #[test]
    fn test_visible_social_links_filtered_and_sorted() {
        let links = vec![
            SocialLink::from_doc(&doc("a", json!({ "platform": "github", "priority": 2 }))),
            SocialLink::from_doc(&doc(
                "b",
                json!({ "platform": "x", "priority": 0, "is_visible": false }),
            )),
            SocialLink::from_doc(&doc("c", json!({ "platform": "rss", "priority": 1 }))),
        ];

        let visible = visible_social_links(&links);
        let platforms: Vec<&str> = visible.iter().map(|l| l.platform.as_str()).collect();
        assert_eq!(platforms, vec!["rss", "github"]);
    }

    #[test]
    fn test_favorite_uses_filtered_and_sorted() {
        let items = vec![
            UsesItem::from_doc(&doc(
                "u1",
                json!({ "name": "Helix", "is_favorite": true, "priority": 3 }),
            )),
            UsesItem::from_doc(&doc("u2", json!({ "name": "Bash", "priority": 1 }))),
            UsesItem::from_doc(&doc(
                "u3",
                json!({ "name": "tmux", "is_favorite": true, "priority": 1 }),
            )),
        ];

        let favorites = favorite_uses(&items);
        let names: Vec<&str> = favorites.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["tmux", "Helix"]);
    }
}
