// Journal entry categories and the shared authorization rules.
pub mod gate;
pub mod payload;

/// The nine entry categories. Every category shares one storage table and
/// one handler set; the descriptor methods below carry the per-category
/// differences (URL slug, error noun, list ordering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Appointments,
    Emotions,
    Gratitude,
    Ideas,
    Improvement,
    Knowledge,
    Notes,
    Target,
    Win,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Appointments,
        Category::Emotions,
        Category::Gratitude,
        Category::Ideas,
        Category::Improvement,
        Category::Knowledge,
        Category::Notes,
        Category::Target,
        Category::Win,
    ];

    /// Resolve a URL path segment; unknown segments mean the route does not
    /// exist.
    pub fn from_slug(slug: &str) -> Option<Category> {
        match slug {
            "appointments" => Some(Category::Appointments),
            "emotions" => Some(Category::Emotions),
            "gratitude" => Some(Category::Gratitude),
            "ideas" => Some(Category::Ideas),
            "improvement" => Some(Category::Improvement),
            "knowledge" => Some(Category::Knowledge),
            "notes" => Some(Category::Notes),
            "target" => Some(Category::Target),
            "win" => Some(Category::Win),
            _ => None,
        }
    }

    pub fn slug(&self) -> &'static str {
        match self {
            Category::Appointments => "appointments",
            Category::Emotions => "emotions",
            Category::Gratitude => "gratitude",
            Category::Ideas => "ideas",
            Category::Improvement => "improvement",
            Category::Knowledge => "knowledge",
            Category::Notes => "notes",
            Category::Target => "target",
            Category::Win => "win",
        }
    }

    /// Plural noun used in authorization error messages.
    pub fn noun(&self) -> &'static str {
        match self {
            Category::Appointments => "appointments",
            Category::Emotions => "emotions",
            Category::Gratitude => "gratitudes",
            Category::Ideas => "ideas",
            Category::Improvement => "improvements",
            Category::Knowledge => "knowledge entries",
            Category::Notes => "notes",
            Category::Target => "targets",
            Category::Win => "wins",
        }
    }

    /// ORDER BY clause for list responses. Appointments sort by their own
    /// calendar slot and targets by their explicit position; everything else
    /// lists in creation order. The id tiebreaker keeps same-timestamp rows
    /// stable.
    pub fn order_by(&self) -> &'static str {
        match self {
            Category::Appointments => "date ASC, time_from ASC, id ASC",
            Category::Target => "entry_order ASC, id ASC",
            _ => "created_on ASC, id ASC",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.slug())
    }
}
