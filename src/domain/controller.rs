use crate::domain::validator::{
    apply_preset, clamp_end_to_today, clamp_start_for_max_range, days_before,
};
use crate::domain::{
    DateRangeFilter, DaysOfWeek, Draft, FilterIssue, FilterPatch, GroupState, RangeSlot,
    WeekdayGroup, enumerate_weekdays_in_range, parse_date_input, reformat_for_display,
};
use crate::infrastructure::{Clock, FilterStore};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// What closing the editor without pressing apply does with the draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DismissPolicy {
    /// Commit the draft if it is valid, discard it otherwise.
    #[default]
    #[serde(rename = "apply")]
    ApplyIfValid,
    #[serde(rename = "discard")]
    Discard,
}

/// Default range for a slot, expressed relative to today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotDefault {
    pub lookback_days: u32,
    #[serde(default)]
    pub days_of_the_week: DaysOfWeek,
}

impl SlotDefault {
    pub fn today_only() -> Self {
        Self {
            lookback_days: 1,
            days_of_the_week: DaysOfWeek::all(),
        }
    }

    pub fn filter(&self, today: NaiveDate) -> DateRangeFilter {
        DateRangeFilter::from_lookback(self.lookback_days, today).with_days(self.days_of_the_week)
    }
}

/// Configuration one editor needs, independent of the current date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotRules {
    pub max_date_range: u32,
    /// Written by reset. `None` clears the slot.
    pub default: Option<SlotDefault>,
    /// Seeds the draft when the slot holds no committed filter.
    pub fallback: SlotDefault,
    pub dismiss_policy: DismissPolicy,
}

impl SlotRules {
    pub fn context(&self, today: NaiveDate) -> EditorContext {
        let max_date_range = self.max_date_range.max(1);
        let default_filter = self
            .default
            .as_ref()
            .map(|default| default.filter(today).normalized(today, max_date_range));
        let seed_filter = default_filter
            .clone()
            .unwrap_or_else(|| self.fallback.filter(today).normalized(today, max_date_range));
        EditorContext {
            today,
            max_date_range,
            default_filter,
            seed_filter,
            dismiss_policy: self.dismiss_policy,
        }
    }
}

/// Everything a transition reads besides the state and the committed filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorContext {
    pub today: NaiveDate,
    pub max_date_range: u32,
    pub default_filter: Option<DateRangeFilter>,
    pub seed_filter: DateRangeFilter,
    pub dismiss_policy: DismissPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    Closed,
    Open { draft: Draft, edited: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EditorPhase {
    Closed,
    OpenClean,
    OpenDirty,
}

impl EditorState {
    pub fn phase(&self) -> EditorPhase {
        match self {
            EditorState::Closed => EditorPhase::Closed,
            EditorState::Open { edited: false, .. } => EditorPhase::OpenClean,
            EditorState::Open { edited: true, .. } => EditorPhase::OpenDirty,
        }
    }

    pub fn draft(&self) -> Option<&Draft> {
        match self {
            EditorState::Closed => None,
            EditorState::Open { draft, .. } => Some(draft),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self, EditorState::Open { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorAction {
    Open,
    Cancel,
    /// Focus left the editor (click-away or close icon).
    Dismiss,
    Apply,
    Reset,
    SetStartDate(String),
    SetEndDate(String),
    ApplyPreset(u32),
    SetDay { day: usize, included: bool },
    ToggleDay(usize),
    ToggleGroup(WeekdayGroup),
    Patch(FilterPatch),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    Clamped(FilterIssue),
    Ignored(FilterIssue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Committed,
    /// Draft equals the committed filter; closed without committing.
    Unchanged,
    Rejected(FilterIssue),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Opened,
    Discarded,
    Edited(EditOutcome),
    Apply(ApplyOutcome),
    Reset,
    NotOpen,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Commit(Option<DateRangeFilter>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: EditorState,
    pub effect: Option<Effect>,
    pub outcome: Outcome,
}

impl Transition {
    fn to(state: EditorState, outcome: Outcome) -> Self {
        Self {
            state,
            effect: None,
            outcome,
        }
    }

    fn commit(filter: Option<DateRangeFilter>, outcome: Outcome) -> Self {
        Self {
            state: EditorState::Closed,
            effect: Some(Effect::Commit(filter)),
            outcome,
        }
    }
}

/// The editor state machine. Pure: the committed filter is only read, and a
/// commit is returned as an [`Effect`] for the caller to carry out.
pub fn reduce(
    state: EditorState,
    action: EditorAction,
    committed: Option<&DateRangeFilter>,
    ctx: &EditorContext,
) -> Transition {
    match (state, action) {
        (_, EditorAction::Open) => {
            let seed = committed.unwrap_or(&ctx.seed_filter);
            Transition::to(
                EditorState::Open {
                    draft: Draft::seed(seed),
                    edited: false,
                },
                Outcome::Opened,
            )
        }
        (_, EditorAction::Reset) => Transition::commit(ctx.default_filter.clone(), Outcome::Reset),
        (EditorState::Closed, _) => Transition::to(EditorState::Closed, Outcome::NotOpen),
        (EditorState::Open { .. }, EditorAction::Cancel) => {
            Transition::to(EditorState::Closed, Outcome::Discarded)
        }
        (EditorState::Open { draft, .. }, EditorAction::Dismiss) => match ctx.dismiss_policy {
            DismissPolicy::ApplyIfValid if draft.filter().has_usable_day() => {
                apply(draft, committed)
            }
            _ => Transition::to(EditorState::Closed, Outcome::Discarded),
        },
        (EditorState::Open { draft, .. }, EditorAction::Apply) => apply(draft, committed),
        (EditorState::Open { draft, edited }, action) => {
            let (draft, outcome) = edit(&draft, action, ctx);
            let edited = edited || !matches!(outcome, EditOutcome::Ignored(_));
            Transition::to(EditorState::Open { draft, edited }, Outcome::Edited(outcome))
        }
    }
}

fn apply(draft: Draft, committed: Option<&DateRangeFilter>) -> Transition {
    if !draft.filter().has_usable_day() {
        return Transition::to(
            EditorState::Open {
                draft,
                edited: true,
            },
            Outcome::Apply(ApplyOutcome::Rejected(FilterIssue::NoUsableDay)),
        );
    }

    if !draft.is_dirty(committed) {
        return Transition::to(EditorState::Closed, Outcome::Apply(ApplyOutcome::Unchanged));
    }

    Transition::commit(
        Some(draft.into_filter()),
        Outcome::Apply(ApplyOutcome::Committed),
    )
}

fn clamp_outcome(clamped: bool) -> EditOutcome {
    if clamped {
        EditOutcome::Clamped(FilterIssue::InvalidRange)
    } else {
        EditOutcome::Applied
    }
}

fn edit(draft: &Draft, action: EditorAction, ctx: &EditorContext) -> (Draft, EditOutcome) {
    let filter = draft.filter();
    let days = filter.days_of_the_week;

    match action {
        EditorAction::SetEndDate(input) => {
            let Some(requested_end) = parse_date_input(&input) else {
                return (draft.clone(), EditOutcome::Ignored(FilterIssue::EmptyDateInput));
            };
            let end_date = clamp_end_to_today(requested_end, ctx.today);
            let start_date = clamp_start_for_max_range(end_date, filter.start_date, ctx.max_date_range);
            let clamped = end_date != requested_end || start_date != filter.start_date;
            let patch = FilterPatch {
                start_date: Some(start_date),
                end_date: Some(end_date),
                lookback_days: Some(None),
                ..FilterPatch::default()
            };
            (draft.patch(patch), clamp_outcome(clamped))
        }
        EditorAction::SetStartDate(input) => {
            let Some(requested_start) = parse_date_input(&input) else {
                return (draft.clone(), EditOutcome::Ignored(FilterIssue::EmptyDateInput));
            };
            let start_date =
                clamp_start_for_max_range(filter.end_date, requested_start, ctx.max_date_range);
            let patch = FilterPatch {
                start_date: Some(start_date),
                lookback_days: Some(None),
                ..FilterPatch::default()
            };
            (draft.patch(patch), clamp_outcome(start_date != requested_start))
        }
        EditorAction::ApplyPreset(lookback_days) => {
            let (requested_start, end_date) = apply_preset(lookback_days, ctx.today);
            let start_date = clamp_start_for_max_range(end_date, requested_start, ctx.max_date_range);
            let effective_days = if start_date == requested_start {
                lookback_days.max(1)
            } else {
                ctx.max_date_range
            };
            let patch = FilterPatch {
                start_date: Some(start_date),
                end_date: Some(end_date),
                days_of_the_week: None,
                lookback_days: Some(Some(effective_days)),
            };
            (draft.patch(patch), clamp_outcome(start_date != requested_start))
        }
        EditorAction::SetDay { day, included } => (
            draft.patch(FilterPatch::days(days.set_day(day, included))),
            EditOutcome::Applied,
        ),
        EditorAction::ToggleDay(day) => (
            draft.patch(FilterPatch::days(days.toggle_day(day))),
            EditOutcome::Applied,
        ),
        EditorAction::ToggleGroup(group) => (
            draft.patch(FilterPatch::days(days.toggle_group(group.days()))),
            EditOutcome::Applied,
        ),
        EditorAction::Patch(patch) => {
            let touches_dates = patch.touches_dates();
            let explicit_lookback = patch.lookback_days.is_some();
            let mut patched = draft.patch(patch);
            if !touches_dates {
                return (patched, EditOutcome::Applied);
            }

            let before = patched.filter().clone();
            let normalized = before.clone().normalized(ctx.today, ctx.max_date_range);
            let clamped = normalized != before;
            patched = patched.patch(FilterPatch {
                start_date: Some(normalized.start_date),
                end_date: Some(normalized.end_date),
                days_of_the_week: None,
                lookback_days: if explicit_lookback { None } else { Some(None) },
            });
            (patched, clamp_outcome(clamped))
        }
        EditorAction::Open
        | EditorAction::Cancel
        | EditorAction::Dismiss
        | EditorAction::Apply
        | EditorAction::Reset => (draft.clone(), EditOutcome::Applied),
    }
}

/// Read-only values the rendering surface shows for one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub slot: RangeSlot,
    /// Summary of the committed filter, shown on the closed control.
    pub main_label: String,
    pub secondary_label: String,
    /// False when no included weekday falls inside the range being edited
    /// (or committed, while closed). Apply is disabled and an advisory shown.
    pub is_valid: bool,
    /// Draft differs structurally from the committed filter. Recomputed on
    /// every change, so editing a value back clears it. Drives the dirty
    /// marker and whether apply would commit anything.
    pub is_dirty: bool,
    /// Editor phase. `OpenDirty` sticks once any edit lands, even if the
    /// draft later matches the committed filter again; use `is_dirty` for
    /// display.
    pub phase: EditorPhase,
    pub draft: Option<DateRangeFilter>,
    pub weekdays: GroupState,
    pub weekends: GroupState,
    pub live_weekdays: Vec<usize>,
    /// Earliest start the start-date input should offer.
    pub min_start_date: Option<NaiveDate>,
    /// Latest end the end-date input should offer.
    pub max_end_date: NaiveDate,
}

impl ViewModel {
    pub fn show_no_days_warning(&self) -> bool {
        !self.is_valid
    }
}

pub fn view_model(
    slot: RangeSlot,
    state: &EditorState,
    committed: Option<&DateRangeFilter>,
    ctx: &EditorContext,
) -> ViewModel {
    let (main_label, secondary_label) = match committed {
        Some(filter) => {
            let labels = reformat_for_display(filter);
            (labels.main_label, labels.secondary_label)
        }
        None => ("None".to_string(), String::new()),
    };

    let shown = state.draft().map(Draft::filter).or(committed);
    let live_weekdays: Vec<usize> = shown
        .map(|filter| enumerate_weekdays_in_range(filter.start_date, filter.end_date))
        .unwrap_or_default()
        .into_iter()
        .collect();
    let days = shown
        .map(|filter| filter.days_of_the_week)
        .unwrap_or_else(DaysOfWeek::none);

    ViewModel {
        slot,
        main_label,
        secondary_label,
        is_valid: shown.is_none_or(DateRangeFilter::has_usable_day),
        is_dirty: state.draft().is_some_and(|draft| draft.is_dirty(committed)),
        phase: state.phase(),
        draft: state.draft().map(|draft| draft.filter().clone()),
        weekdays: days.group_state(WeekdayGroup::Weekdays),
        weekends: days.group_state(WeekdayGroup::Weekends),
        live_weekdays,
        min_start_date: shown.map(|filter| {
            days_before(filter.end_date, i64::from(ctx.max_date_range.max(1)) - 1)
        }),
        max_end_date: ctx.today,
    }
}

/// Editor for one range slot, wired to the committed store and a clock.
pub struct FilterCommitController {
    slot: RangeSlot,
    rules: SlotRules,
    clock: Rc<dyn Clock>,
    state: EditorState,
    /// Committed value the open draft was seeded from.
    seeded_from: Option<DateRangeFilter>,
}

impl FilterCommitController {
    pub fn new(slot: RangeSlot, rules: SlotRules, clock: Rc<dyn Clock>) -> Self {
        Self {
            slot,
            rules,
            clock,
            state: EditorState::Closed,
            seeded_from: None,
        }
    }

    pub fn slot(&self) -> RangeSlot {
        self.slot
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn context(&self) -> EditorContext {
        self.rules.context(self.clock.today())
    }

    pub fn dispatch(&mut self, action: EditorAction, store: &mut dyn FilterStore) -> Outcome {
        log::debug!("{}: {:?}", self.slot, action);

        let ctx = self.context();
        let committed = store.committed(self.slot);
        let opening = action == EditorAction::Open;
        let state = std::mem::replace(&mut self.state, EditorState::Closed);

        let transition = reduce(state, action, committed.as_ref(), &ctx);

        if let Some(Effect::Commit(filter)) = transition.effect {
            let changed = store.commit(self.slot, filter);
            log::info!(
                "{}: {:?} ({})",
                self.slot,
                transition.outcome,
                if changed { "committed" } else { "no change" }
            );
        }

        if let Outcome::Apply(ApplyOutcome::Rejected(issue)) = transition.outcome {
            log::warn!("{}: apply rejected: {:?}", self.slot, issue);
        }

        self.state = transition.state;
        if opening {
            self.seeded_from = committed;
        } else if !self.state.is_open() {
            self.seeded_from = None;
        }

        transition.outcome
    }

    /// Reseeds an open draft when the committed filter changed underneath it
    /// (history navigation, another surface). Returns true if it reseeded.
    pub fn sync_with_store(&mut self, store: &dyn FilterStore) -> bool {
        if !self.state.is_open() {
            return false;
        }

        let committed = store.committed(self.slot);
        if committed == self.seeded_from {
            return false;
        }

        log::info!("{}: committed filter changed, reseeding draft", self.slot);
        let seed = committed
            .clone()
            .unwrap_or_else(|| self.context().seed_filter);
        self.state = EditorState::Open {
            draft: Draft::seed(&seed),
            edited: false,
        };
        self.seeded_from = committed;
        true
    }

    pub fn view_model(&self, store: &dyn FilterStore) -> ViewModel {
        let committed = store.committed(self.slot);
        view_model(self.slot, &self.state, committed.as_ref(), &self.context())
    }

    pub fn open_editor(&mut self, store: &mut dyn FilterStore) -> Outcome {
        self.dispatch(EditorAction::Open, store)
    }

    pub fn close_editor(&mut self, store: &mut dyn FilterStore) -> Outcome {
        self.dispatch(EditorAction::Dismiss, store)
    }

    pub fn cancel_editor(&mut self, store: &mut dyn FilterStore) -> Outcome {
        self.dispatch(EditorAction::Cancel, store)
    }

    pub fn patch_draft(&mut self, patch: FilterPatch, store: &mut dyn FilterStore) -> Outcome {
        self.dispatch(EditorAction::Patch(patch), store)
    }

    pub fn set_start_date(&mut self, input: &str, store: &mut dyn FilterStore) -> Outcome {
        self.dispatch(EditorAction::SetStartDate(input.to_string()), store)
    }

    pub fn set_end_date(&mut self, input: &str, store: &mut dyn FilterStore) -> Outcome {
        self.dispatch(EditorAction::SetEndDate(input.to_string()), store)
    }

    pub fn apply_preset(&mut self, lookback_days: u32, store: &mut dyn FilterStore) -> Outcome {
        self.dispatch(EditorAction::ApplyPreset(lookback_days), store)
    }

    pub fn set_day(&mut self, day: usize, included: bool, store: &mut dyn FilterStore) -> Outcome {
        self.dispatch(EditorAction::SetDay { day, included }, store)
    }

    pub fn toggle_day(&mut self, day: usize, store: &mut dyn FilterStore) -> Outcome {
        self.dispatch(EditorAction::ToggleDay(day), store)
    }

    pub fn toggle_weekday_group(
        &mut self,
        group: WeekdayGroup,
        store: &mut dyn FilterStore,
    ) -> Outcome {
        self.dispatch(EditorAction::ToggleGroup(group), store)
    }

    pub fn apply_draft(&mut self, store: &mut dyn FilterStore) -> Outcome {
        self.dispatch(EditorAction::Apply, store)
    }

    pub fn reset_to_default(&mut self, store: &mut dyn FilterStore) -> Outcome {
        self.dispatch(EditorAction::Reset, store)
    }
}
