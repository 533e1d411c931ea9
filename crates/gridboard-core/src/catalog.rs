//! The widget catalog: kinds, their default geometry, and resize policies.
//!
//! Every widget kind has a static [`WidgetSpec`] describing the size it is
//! created with, the smallest size it may be resized to, and the
//! [`ResizePolicy`] the mutation pipeline applies to it. The policy is part
//! of the catalog entry so call sites match on an enum once instead of
//! re-inspecting kind strings.

use crate::geometry::GridSize;

/// How a widget kind responds to interactive resize proposals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResizePolicy {
    /// Both dimensions resize freely within board bounds.
    #[default]
    Free,
    /// Size never changes after creation; only position moves.
    Fixed,
    /// Width and height are kept equal; the dominant proposed delta wins.
    Square,
}

/// A closed enumeration of the widget kinds a board can host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum WidgetKind {
    Todo,
    Notes,
    QuickLinks,
    AnalogClock,
    Date,
    DigitalClock,
    Weather,
    Calendar,
    Pomodoro,
    Scratchpad,
    Bookmark,
}

/// Catalog entry for a widget kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetSpec {
    /// The kind this entry describes.
    pub kind: WidgetKind,
    /// Default display title.
    pub title: &'static str,
    /// Short description shown in pickers.
    pub description: &'static str,
    /// Icon name for pickers.
    pub icon: &'static str,
    /// Size assigned at creation.
    pub default_size: GridSize,
    /// Smallest size a resize may produce.
    pub min_size: GridSize,
    /// Resize constraint applied by the mutation pipeline.
    pub resize: ResizePolicy,
}

const TODO: WidgetSpec = WidgetSpec {
    kind: WidgetKind::Todo,
    title: "Todo",
    description: "Capture quick action items and mark them done.",
    icon: "CheckSquare",
    default_size: GridSize::new(4, 5),
    min_size: GridSize::new(3, 3),
    resize: ResizePolicy::Free,
};

const NOTES: WidgetSpec = WidgetSpec {
    kind: WidgetKind::Notes,
    title: "Notes",
    description: "Drop rich notes with titles and fast search.",
    icon: "NotebookPen",
    default_size: GridSize::new(4, 5),
    min_size: GridSize::new(3, 3),
    resize: ResizePolicy::Free,
};

const QUICK_LINKS: WidgetSpec = WidgetSpec {
    kind: WidgetKind::QuickLinks,
    title: "Quick Links",
    description: "One-tap launchers to the destinations you use daily.",
    icon: "Link2",
    default_size: GridSize::new(1, 1),
    min_size: GridSize::new(1, 1),
    resize: ResizePolicy::Free,
};

const ANALOG_CLOCK: WidgetSpec = WidgetSpec {
    kind: WidgetKind::AnalogClock,
    title: "Analog Clock",
    description: "Classic analog clock display.",
    icon: "Clock",
    default_size: GridSize::new(2, 2),
    min_size: GridSize::new(2, 2),
    resize: ResizePolicy::Square,
};

const DATE: WidgetSpec = WidgetSpec {
    kind: WidgetKind::Date,
    title: "Date",
    description: "Current date display.",
    icon: "Calendar",
    default_size: GridSize::new(3, 1),
    min_size: GridSize::new(3, 1),
    resize: ResizePolicy::Fixed,
};

const DIGITAL_CLOCK: WidgetSpec = WidgetSpec {
    kind: WidgetKind::DigitalClock,
    title: "Digital Clock",
    description: "Digital time display with format toggle.",
    icon: "Watch",
    default_size: GridSize::new(2, 1),
    min_size: GridSize::new(2, 1),
    resize: ResizePolicy::Free,
};

const WEATHER: WidgetSpec = WidgetSpec {
    kind: WidgetKind::Weather,
    title: "Weather",
    description: "Current weather conditions and forecast.",
    icon: "Cloud",
    default_size: GridSize::new(3, 4),
    min_size: GridSize::new(3, 4),
    resize: ResizePolicy::Free,
};

const CALENDAR: WidgetSpec = WidgetSpec {
    kind: WidgetKind::Calendar,
    title: "Calendar",
    description: "Monthly calendar view with events.",
    icon: "Calendar",
    default_size: GridSize::new(4, 5),
    min_size: GridSize::new(4, 5),
    resize: ResizePolicy::Free,
};

const POMODORO: WidgetSpec = WidgetSpec {
    kind: WidgetKind::Pomodoro,
    title: "Pomodoro Timer",
    description: "Focus timer using the Pomodoro technique.",
    icon: "Timer",
    default_size: GridSize::new(4, 3),
    min_size: GridSize::new(4, 3),
    resize: ResizePolicy::Free,
};

const SCRATCHPAD: WidgetSpec = WidgetSpec {
    kind: WidgetKind::Scratchpad,
    title: "Scratchpad",
    description: "A simple text area to write anything you want.",
    icon: "FileText",
    default_size: GridSize::new(6, 4),
    min_size: GridSize::new(3, 2),
    resize: ResizePolicy::Free,
};

const BOOKMARK: WidgetSpec = WidgetSpec {
    kind: WidgetKind::Bookmark,
    title: "Bookmark",
    description: "A folder of saved links, droppable onto other boards.",
    icon: "Bookmark",
    default_size: GridSize::new(1, 1),
    min_size: GridSize::new(1, 1),
    resize: ResizePolicy::Free,
};

impl WidgetKind {
    /// All kinds, in catalog order.
    pub const ALL: [WidgetKind; 11] = [
        WidgetKind::Todo,
        WidgetKind::Notes,
        WidgetKind::QuickLinks,
        WidgetKind::AnalogClock,
        WidgetKind::Date,
        WidgetKind::DigitalClock,
        WidgetKind::Weather,
        WidgetKind::Calendar,
        WidgetKind::Pomodoro,
        WidgetKind::Scratchpad,
        WidgetKind::Bookmark,
    ];

    /// The catalog entry for this kind.
    #[must_use]
    pub const fn spec(self) -> &'static WidgetSpec {
        match self {
            WidgetKind::Todo => &TODO,
            WidgetKind::Notes => &NOTES,
            WidgetKind::QuickLinks => &QUICK_LINKS,
            WidgetKind::AnalogClock => &ANALOG_CLOCK,
            WidgetKind::Date => &DATE,
            WidgetKind::DigitalClock => &DIGITAL_CLOCK,
            WidgetKind::Weather => &WEATHER,
            WidgetKind::Calendar => &CALENDAR,
            WidgetKind::Pomodoro => &POMODORO,
            WidgetKind::Scratchpad => &SCRATCHPAD,
            WidgetKind::Bookmark => &BOOKMARK,
        }
    }

    /// Stable kebab-case label, also the serialized form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            WidgetKind::Todo => "todo",
            WidgetKind::Notes => "notes",
            WidgetKind::QuickLinks => "quick-links",
            WidgetKind::AnalogClock => "analog-clock",
            WidgetKind::Date => "date",
            WidgetKind::DigitalClock => "digital-clock",
            WidgetKind::Weather => "weather",
            WidgetKind::Calendar => "calendar",
            WidgetKind::Pomodoro => "pomodoro",
            WidgetKind::Scratchpad => "scratchpad",
            WidgetKind::Bookmark => "bookmark",
        }
    }

    /// Resize constraint for this kind, resolved from the catalog.
    #[must_use]
    pub const fn resize_policy(self) -> ResizePolicy {
        self.spec().resize
    }
}

impl std::fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_covers_every_kind() {
        // Each spec names the kind it is registered under.
        for kind in WidgetKind::ALL {
            assert_eq!(kind.spec().kind, kind);
        }
    }

    #[test]
    fn min_size_never_exceeds_default() {
        for kind in WidgetKind::ALL {
            let spec = kind.spec();
            assert!(spec.min_size.w <= spec.default_size.w, "{kind}");
            assert!(spec.min_size.h <= spec.default_size.h, "{kind}");
        }
    }

    #[test]
    fn square_kinds_have_square_defaults() {
        for kind in WidgetKind::ALL {
            let spec = kind.spec();
            if spec.resize == ResizePolicy::Square {
                assert_eq!(spec.default_size.w, spec.default_size.h, "{kind}");
            }
        }
    }

    #[test]
    fn constraint_policies_from_catalog() {
        assert_eq!(WidgetKind::Date.resize_policy(), ResizePolicy::Fixed);
        assert_eq!(WidgetKind::AnalogClock.resize_policy(), ResizePolicy::Square);
        assert_eq!(WidgetKind::Todo.resize_policy(), ResizePolicy::Free);
    }

    #[test]
    fn labels_are_kebab_case() {
        assert_eq!(WidgetKind::QuickLinks.label(), "quick-links");
        assert_eq!(WidgetKind::AnalogClock.to_string(), "analog-clock");
    }
}
