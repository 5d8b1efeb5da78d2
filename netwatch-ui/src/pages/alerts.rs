use leptos::*;
use std::collections::BTreeSet;

use gloo_timers::future::TimeoutFuture;
use netwatch_common::{AlertRecord, AlertStatus, Severity, SuppressDuration, Team};

use crate::api::{self, AlertQuery};
use crate::table::{
    build_view, default_columns, groupable_columns, leaf_cell_in_group, pager, BulkOutcome,
    BulkVerb, ColumnId, FilterSet, HeaderState, MutationAction, MutationState, PageSize,
    PageState, PagerAction, RowHandle, SelectionAction, SelectionState, SortSpec, TableRow,
};
use crate::utils::{format_age, format_timestamp, severity_class};

/// Upper bound on the snapshot size requested per fetch
const FETCH_LIMIT: usize = 2000;
/// The alert manager is eventually consistent: a refetch issued right after a
/// mutation would read back the pre-mutation state
const MUTATION_REFETCH_DELAY_MS: u32 = 2_000;
const POLL_INTERVAL_MS: u32 = 30_000;

#[derive(Clone, PartialEq)]
enum Notice {
    Success(String),
    Error(String),
}

#[derive(Clone)]
enum BulkRequest {
    Acknowledge,
    Clear,
    Suppress { duration: SuppressDuration, reason: String },
    Severity(Severity),
}

#[component]
pub fn AlertsPage() -> impl IntoView {
    // Snapshot and fetch state
    let (alerts, set_alerts) = create_signal(Vec::<AlertRecord>::new());
    let (loading, set_loading) = create_signal(true);
    let (notice, set_notice) = create_signal(None::<Notice>);
    // Monotonic fetch sequence; responses not matching the latest issued
    // sequence are stale and get dropped
    let (fetch_seq, set_fetch_seq) = create_signal(0u64);

    // Table state
    let (filters, set_filters) = create_signal(FilterSet::new());
    let (group_by, set_group_by) = create_signal(Vec::<ColumnId>::new());
    let (sort, set_sort) = create_signal(None::<SortSpec>);
    let (page, set_page) = create_signal(PageState::default());
    let (selection, set_selection) = create_signal(SelectionState::new());
    let (mutation, set_mutation) = create_signal(MutationState::default());

    // Widget-local state
    let (name_input, set_name_input) = create_signal(String::new());
    let (expanded, set_expanded) = create_signal(BTreeSet::<String>::new());
    let (teams, set_teams) = create_signal(Vec::<Team>::new());
    let (auto_refresh, set_auto_refresh) = create_signal(false);
    let (show_filters, set_show_filters) = create_signal(false);
    let (bulk_severity, set_bulk_severity) = create_signal("CRITICAL".to_string());

    // Modals
    let (detail, set_detail) = create_signal(None::<AlertRecord>);
    let (show_suppress_modal, set_show_suppress_modal) = create_signal(false);
    let (suppress_duration, set_suppress_duration) = create_signal("4".to_string());
    let (suppress_reason, set_suppress_reason) = create_signal(String::new());
    let (contributing, set_contributing) = create_signal(None::<(String, Vec<AlertRecord>)>);

    // Load the alert snapshot. Only status/time-range/limit narrow the
    // server response; everything else filters client-side.
    let load_alerts = create_action(move |_: &()| async move {
        let seq = fetch_seq.get_untracked() + 1;
        set_fetch_seq.set(seq);
        set_loading.set(true);

        let coordinator = mutation.get_untracked();
        let query = AlertQuery {
            status_in: coordinator.status.iter().copied().collect(),
            time_range_hours: coordinator.time_range_hours,
            limit: Some(FETCH_LIMIT),
            include_history: true,
            ..Default::default()
        };

        let result = api::list_alerts(&query).await;
        if fetch_seq.get_untracked() != seq {
            // A newer fetch superseded this one while it was in flight
            return;
        }
        match result {
            Ok(mut list) => {
                for alert in &mut list {
                    alert.normalize();
                }
                set_alerts.set(list);
            }
            Err(e) => set_notice.set(Some(Notice::Error(format!("Failed to load alerts: {}", e)))),
        }
        set_loading.set(false);
    });

    // Post-mutation refetch, delayed for backend convergence. Cancelled if
    // any other fetch is issued while the timer sleeps.
    let schedule_delayed_refetch = move || {
        let seq_at_schedule = fetch_seq.get_untracked();
        spawn_local(async move {
            TimeoutFuture::new(MUTATION_REFETCH_DELAY_MS).await;
            if fetch_seq.get_untracked() == seq_at_schedule {
                load_alerts.dispatch(());
            }
        });
    };

    // The derived view: recomputed whenever snapshot, filters, grouping,
    // sort or pagination change
    let table_view = create_memo(move |_| {
        let columns = default_columns();
        build_view(
            &alerts.get(),
            &filters.get(),
            &columns,
            &group_by.get(),
            sort.get().as_ref(),
            &page.get(),
        )
    });

    // Keep the stored page index inside the derived bounds
    create_effect(move |_| {
        let derived = table_view.get();
        let current = page.get_untracked();
        if derived.page_index != current.index {
            let (next, effect) = pager::reduce(&current, PagerAction::Reclamp, derived.top_level);
            set_page.set(next);
            if effect.reset_selection {
                set_selection.update(|s| *s = s.reduce(SelectionAction::Clear));
            }
        }
    });

    // Drop selected ids that a filter change removed from the visible set
    create_effect(move |_| {
        let visible = table_view.get().filtered_ids;
        set_selection.update(|s| *s = s.reduce(SelectionAction::Retain(visible)));
    });

    // Clear-flag handshake: each widget observes its own flag, resets its
    // local state and disarms exactly that flag.
    create_effect(move |_| {
        if mutation.get().clear_input {
            set_name_input.set(String::new());
            set_filters.update(|f| f.set_name_query(""));
            set_mutation.update(|m| *m = m.reduce(MutationAction::UnsetClearInput));
        }
    });
    create_effect(move |_| {
        if mutation.get().clear_multiselect {
            set_filters.update(|f| f.clear_selections());
            set_mutation.update(|m| *m = m.reduce(MutationAction::UnsetClearMultiselect));
        }
    });
    create_effect(move |_| {
        if mutation.get().clear_selection {
            set_selection.update(|s| *s = s.reduce(SelectionAction::Clear));
            set_page.update(|p| p.all_selected = false);
            set_mutation.update(|m| *m = m.reduce(MutationAction::UnsetClearSelection));
        }
    });

    // Initial load + team list for the filter sidebar
    create_effect(move |_| {
        load_alerts.dispatch(());
        spawn_local(async move {
            if let Ok(list) = api::list_teams().await {
                set_teams.set(list);
            }
        });
    });

    // Optional polling; the system has no push channel
    create_effect(move |_| {
        if auto_refresh.get() {
            spawn_local(async move {
                loop {
                    TimeoutFuture::new(POLL_INTERVAL_MS).await;
                    if !auto_refresh.get_untracked() {
                        break;
                    }
                    load_alerts.dispatch(());
                }
            });
        }
    });

    // Distinct client-side filter options, derived from the snapshot
    let filter_options = create_memo(move |_| {
        let rows = alerts.get();
        let distinct = |pick: fn(&AlertRecord) -> &str| -> Vec<String> {
            let mut set = BTreeSet::new();
            for row in &rows {
                set.insert(pick(row).to_string());
            }
            set.into_iter().collect()
        };
        (distinct(|r| &r.site), distinct(|r| &r.device), distinct(|r| &r.source))
    });

    // Server-side status filter: changing it arms the clear cycle and refetches
    let toggle_status = move |status: AlertStatus| {
        let current = mutation.get_untracked();
        let mut statuses = current.status.clone();
        if !statuses.remove(&status) {
            statuses.insert(status);
        }
        let next = current.reduce(MutationAction::SetStatus(statuses.into_iter().collect()));
        if current.requires_refetch(&next) {
            set_mutation.set(next.reduce(MutationAction::SetClearMutations));
            load_alerts.dispatch(());
        } else {
            set_mutation.set(next);
        }
    };

    let set_time_range = move |value: String| {
        let current = mutation.get_untracked();
        let next = current.reduce(MutationAction::SetTimeRange(value.parse::<u32>().ok()));
        if current.requires_refetch(&next) {
            set_mutation.set(next.reduce(MutationAction::SetClearMutations));
            load_alerts.dispatch(());
        } else {
            set_mutation.set(next);
        }
    };

    let toggle_row = move |handle: RowHandle| {
        let action = match selection.get_untracked().row_state(&handle) {
            HeaderState::Unselected => SelectionAction::Select(handle),
            _ => SelectionAction::Unselect(handle),
        };
        set_selection.update(|s| *s = s.reduce(action));
    };

    // "Select page", deliberately not "select all filtered rows"
    let toggle_select_page = move |_| {
        let handles: Vec<RowHandle> = table_view.get_untracked().rows.iter().map(RowHandle::of).collect();
        let currently = page.get_untracked().all_selected;
        let action = if currently {
            SelectionAction::UnselectAll(handles)
        } else {
            SelectionAction::SelectAll(handles)
        };
        set_selection.update(|s| *s = s.reduce(action));
        set_page.update(|p| p.all_selected = !currently);
    };

    let apply_pager = move |action: PagerAction| {
        let top_level = table_view.get_untracked().top_level;
        let (next, effect) = pager::reduce(&page.get_untracked(), action, top_level);
        set_page.set(next);
        if effect.reset_selection {
            set_selection.update(|s| *s = s.reduce(SelectionAction::Clear));
        }
    };

    let toggle_sort = move |column: ColumnId| {
        set_sort.update(|s| {
            *s = match *s {
                Some(SortSpec { column: current, descending: false }) if current == column => {
                    Some(SortSpec { column, descending: true })
                }
                Some(SortSpec { column: current, descending: true }) if current == column => None,
                _ => Some(SortSpec { column, descending: false }),
            }
        });
    };

    let toggle_group = move |column: ColumnId| {
        set_group_by.update(|g| {
            if let Some(pos) = g.iter().position(|c| *c == column) {
                g.remove(pos);
            } else {
                g.push(column);
            }
        });
        set_expanded.update(|e| e.clear());
    };

    // One awaited remote call per selected id; per-item results fold into a
    // single aggregate notification, then clear-and-refetch runs regardless.
    let run_bulk = create_action(move |request: &BulkRequest| {
        let request = request.clone();
        async move {
            let ids: Vec<String> = selection.get_untracked().ordered().to_vec();
            if ids.is_empty() {
                return;
            }
            let owner = api::current_user().unwrap_or_else(|| "operator".to_string());
            let verb = match &request {
                BulkRequest::Acknowledge => BulkVerb::Acknowledge,
                BulkRequest::Clear => BulkVerb::Clear,
                BulkRequest::Suppress { .. } => BulkVerb::Suppress,
                BulkRequest::Severity(sev) => BulkVerb::SetSeverity(*sev),
            };
            let mut outcome = BulkOutcome::new(verb);
            for id in &ids {
                let result = match &request {
                    BulkRequest::Acknowledge => api::acknowledge_alert(id, &owner).await,
                    BulkRequest::Clear => api::clear_alert(id).await,
                    BulkRequest::Suppress { duration, reason } => {
                        api::suppress_alert(id, *duration, reason).await
                    }
                    BulkRequest::Severity(sev) => api::update_severity(id, *sev).await,
                };
                outcome.record(id, result.map_err(|e| e.to_string()));
            }

            if outcome.is_success() {
                set_notice.set(Some(Notice::Success(outcome.summary())));
            } else {
                set_notice.set(Some(Notice::Error(outcome.summary())));
            }

            set_mutation.update(|m| *m = m.reduce(MutationAction::SetClearMutations));
            schedule_delayed_refetch();
        }
    });

    let confirm_suppress = move |_| {
        let duration = match suppress_duration.get().as_str() {
            "until_cleared" => SuppressDuration::UntilCleared,
            value => SuppressDuration::Hours(value.parse().unwrap_or(4)),
        };
        run_bulk.dispatch(BulkRequest::Suppress { duration, reason: suppress_reason.get() });
        set_show_suppress_modal.set(false);
        set_suppress_reason.set(String::new());
    };

    let load_contributing = create_action(move |aggregate_id: &String| {
        let aggregate_id = aggregate_id.clone();
        async move {
            match api::list_contributing_alerts(&aggregate_id).await {
                Ok(list) => set_contributing.set(Some((aggregate_id, list))),
                Err(e) => {
                    set_notice.set(Some(Notice::Error(format!(
                        "Failed to load contributing alerts: {}",
                        e
                    ))))
                }
            }
        }
    });

    view! {
        <div class="alerts-page">
            <div class="page-header">
                <h1>"Alerts"</h1>
                <div class="header-actions">
                    <label class="auto-refresh-toggle">
                        <input
                            type="checkbox"
                            prop:checked=auto_refresh
                            on:change=move |ev| set_auto_refresh.set(event_target_checked(&ev))
                        />
                        "Auto-refresh"
                    </label>
                    <button
                        class="btn btn-secondary"
                        on:click=move |_| load_alerts.dispatch(())
                        disabled=loading
                    >
                        "Refresh"
                    </button>
                </div>
            </div>

            {move || notice.get().map(|n| {
                let (class, text) = match n {
                    Notice::Success(text) => ("alert alert-success", text),
                    Notice::Error(text) => ("alert alert-error", text),
                };
                view! {
                    <div class=class>
                        {text}
                        <button class="notice-dismiss" on:click=move |_| set_notice.set(None)>"x"</button>
                    </div>
                }
            })}

            <div class="alert-filters">
                <div class="filter-row">
                    <input
                        type="text"
                        class="search-input"
                        placeholder="Filter by name (case-sensitive)"
                        prop:value=name_input
                        on:input=move |ev| {
                            let value = event_target_value(&ev);
                            set_name_input.set(value.clone());
                            set_filters.update(|f| f.set_name_query(value));
                        }
                    />

                    <div class="status-filter">
                        {AlertStatus::ALL.into_iter().map(|status| {
                            view! {
                                <label class="filter-checkbox">
                                    <input
                                        type="checkbox"
                                        prop:checked=move || mutation.get().status.contains(&status)
                                        on:change=move |_| toggle_status(status)
                                    />
                                    {status.as_str()}
                                </label>
                            }
                        }).collect::<Vec<_>>()}
                    </div>

                    <select
                        class="filter-select"
                        on:change=move |ev| set_time_range(event_target_value(&ev))
                    >
                        <option value="">"All time"</option>
                        <option value="1">"Last hour"</option>
                        <option value="6">"Last 6 hours"</option>
                        <option value="24">"Last 24 hours"</option>
                        <option value="168">"Last 7 days"</option>
                    </select>

                    <button
                        class="btn btn-secondary"
                        on:click=move |_| set_show_filters.set(!show_filters.get())
                    >
                        {move || if show_filters.get() { "Hide Filters" } else { "More Filters" }}
                    </button>
                    <button
                        class="btn btn-outline"
                        on:click=move |_| {
                            set_name_input.set(String::new());
                            set_filters.update(|f| f.clear_all());
                        }
                    >
                        "Reset"
                    </button>
                </div>

                {move || if show_filters.get() {
                    let (sites, devices, sources) = filter_options.get();
                    view! {
                        <div class="advanced-filters">
                            <div class="filter-section">
                                <h4>"Severity"</h4>
                                {Severity::ALL.into_iter().map(|severity| {
                                    view! {
                                        <label class="filter-checkbox">
                                            <input
                                                type="checkbox"
                                                prop:checked=move || filters.get().is_selected(ColumnId::Severity, severity.as_str())
                                                on:change=move |_| set_filters.update(|f| f.toggle(ColumnId::Severity, severity.as_str()))
                                            />
                                            {severity.as_str()}
                                        </label>
                                    }
                                }).collect::<Vec<_>>()}
                            </div>
                            <div class="filter-section">
                                <h4>"Site"</h4>
                                {sites.into_iter().map(|site| {
                                    let site_for_check = site.clone();
                                    let site_for_change = site.clone();
                                    view! {
                                        <label class="filter-checkbox">
                                            <input
                                                type="checkbox"
                                                prop:checked=move || filters.get().is_selected(ColumnId::Site, &site_for_check)
                                                on:change=move |_| set_filters.update(|f| f.toggle(ColumnId::Site, &site_for_change))
                                            />
                                            {site}
                                        </label>
                                    }
                                }).collect::<Vec<_>>()}
                            </div>
                            <div class="filter-section">
                                <h4>"Device"</h4>
                                {devices.into_iter().map(|device| {
                                    let device_for_check = device.clone();
                                    let device_for_change = device.clone();
                                    view! {
                                        <label class="filter-checkbox">
                                            <input
                                                type="checkbox"
                                                prop:checked=move || filters.get().is_selected(ColumnId::Device, &device_for_check)
                                                on:change=move |_| set_filters.update(|f| f.toggle(ColumnId::Device, &device_for_change))
                                            />
                                            {device}
                                        </label>
                                    }
                                }).collect::<Vec<_>>()}
                            </div>
                            <div class="filter-section">
                                <h4>"Source"</h4>
                                {sources.into_iter().map(|source| {
                                    let source_for_check = source.clone();
                                    let source_for_change = source.clone();
                                    view! {
                                        <label class="filter-checkbox">
                                            <input
                                                type="checkbox"
                                                prop:checked=move || filters.get().is_selected(ColumnId::Source, &source_for_check)
                                                on:change=move |_| set_filters.update(|f| f.toggle(ColumnId::Source, &source_for_change))
                                            />
                                            {source}
                                        </label>
                                    }
                                }).collect::<Vec<_>>()}
                            </div>
                            {move || if teams.get().is_empty() {
                                view! { <div></div> }.into_view()
                            } else {
                                view! {
                                    <div class="filter-section teams-note">
                                        <h4>"Teams"</h4>
                                        <p class="hint">
                                            "Routing teams: "
                                            {teams.get().iter().map(|t| t.name.clone()).collect::<Vec<_>>().join(", ")}
                                        </p>
                                    </div>
                                }.into_view()
                            }}
                        </div>
                    }.into_view()
                } else {
                    view! { <div></div> }.into_view()
                }}

                <div class="group-by-bar">
                    <span class="label">"Group by:"</span>
                    {groupable_columns(&default_columns()).into_iter().map(|column| {
                        let label = default_columns().iter().find(|c| c.id == column).map(|c| c.label).unwrap_or("?");
                        view! {
                            <button
                                class=move || if group_by.get().contains(&column) { "btn btn-sm btn-primary" } else { "btn btn-sm btn-outline" }
                                on:click=move |_| toggle_group(column)
                            >
                                {label}
                            </button>
                        }
                    }).collect::<Vec<_>>()}
                </div>
            </div>

            <div class="bulk-toolbar">
                <span class="selection-count">
                    {move || format!("{} selected", selection.get().len())}
                </span>
                <button
                    class="btn btn-sm btn-secondary"
                    disabled=move || selection.get().is_empty()
                    on:click=move |_| run_bulk.dispatch(BulkRequest::Acknowledge)
                >
                    "Acknowledge"
                </button>
                <button
                    class="btn btn-sm btn-secondary"
                    disabled=move || selection.get().is_empty()
                    on:click=move |_| run_bulk.dispatch(BulkRequest::Clear)
                >
                    "Clear"
                </button>
                <button
                    class="btn btn-sm btn-warning"
                    disabled=move || selection.get().is_empty()
                    on:click=move |_| set_show_suppress_modal.set(true)
                >
                    "Suppress..."
                </button>
                <div class="severity-apply">
                    <select
                        class="filter-select"
                        prop:value=bulk_severity
                        on:change=move |ev| set_bulk_severity.set(event_target_value(&ev))
                    >
                        {Severity::ALL.into_iter().map(|severity| view! {
                            <option value={severity.as_str()}>{severity.as_str()}</option>
                        }).collect::<Vec<_>>()}
                    </select>
                    <button
                        class="btn btn-sm btn-secondary"
                        disabled=move || selection.get().is_empty()
                        on:click=move |_| {
                            if let Ok(severity) = bulk_severity.get().parse::<Severity>() {
                                run_bulk.dispatch(BulkRequest::Severity(severity));
                            }
                        }
                    >
                        "Set severity"
                    </button>
                </div>
            </div>

            {move || if loading.get() {
                view! {
                    <div class="loading-container">
                        <div class="spinner"></div>
                        <p>"Loading alerts..."</p>
                    </div>
                }.into_view()
            } else if table_view.get().rows.is_empty() {
                view! {
                    <div class="empty-state">
                        <h3>"No alerts match"</h3>
                        <p>"Try widening the filters or the time range"</p>
                    </div>
                }.into_view()
            } else {
                view! {
                    <div class="alert-table-container">
                        <table class="alert-table">
                            <thead>
                                <tr>
                                    <th class="select-col">
                                        <input
                                            type="checkbox"
                                            prop:checked=move || page.get().all_selected
                                            on:change=toggle_select_page
                                        />
                                    </th>
                                    {default_columns().into_iter().filter(|c| c.visible).map(|column| {
                                        let id = column.id;
                                        let label = column.label;
                                        view! {
                                            <th class="sortable" on:click=move |_| toggle_sort(id)>
                                                {label}
                                                {move || match sort.get() {
                                                    Some(s) if s.column == id && s.descending => " \u{25bc}",
                                                    Some(s) if s.column == id => " \u{25b2}",
                                                    _ => "",
                                                }}
                                            </th>
                                        }
                                    }).collect::<Vec<_>>()}
                                    <th class="actions-col">"Actions"</th>
                                </tr>
                            </thead>
                            <tbody>
                                {move || {
                                    let gb = group_by.get();
                                    table_view.get().rows.into_iter().map(|row| {
                                        match row {
                                            TableRow::Leaf(record) => {
                                                let handle = RowHandle { key: record.id.clone(), leaf_ids: vec![record.id.clone()] };
                                                let handle_for_toggle = handle.clone();
                                                let record_for_detail = record.clone();
                                                let now = chrono::Utc::now().timestamp();
                                                view! {
                                                    <tr class=format!("alert-row severity-{}", record.severity)>
                                                        <td class="select-col">
                                                            <input
                                                                type="checkbox"
                                                                prop:checked=move || matches!(selection.get().row_state(&handle), HeaderState::Selected)
                                                                on:change=move |_| toggle_row(handle_for_toggle.clone())
                                                            />
                                                        </td>
                                                        <td class="name-cell">{record.name.clone()}</td>
                                                        <td>
                                                            <span class=severity_class(record.severity)>
                                                                {record.severity.as_str()}
                                                            </span>
                                                        </td>
                                                        <td>
                                                            <span class=format!("status-badge status-{}", record.status)>
                                                                {record.status.as_str()}
                                                            </span>
                                                        </td>
                                                        <td>{record.site.clone()}</td>
                                                        <td>{record.device.clone()}</td>
                                                        <td>{record.entity.clone()}</td>
                                                        <td>{record.source.clone()}</td>
                                                        <td>{format_timestamp(record.start_time)}</td>
                                                        <td title=format_timestamp(record.last_active)>
                                                            {format_age(now, record.last_active)}
                                                        </td>
                                                        <td class="actions-cell">
                                                            <button
                                                                class="btn btn-sm btn-secondary"
                                                                on:click=move |_| set_detail.set(Some(record_for_detail.clone()))
                                                            >
                                                                "Details"
                                                            </button>
                                                        </td>
                                                    </tr>
                                                }.into_view()
                                            }
                                            TableRow::Aggregate(group) => {
                                                let row = TableRow::Aggregate(group.clone());
                                                let key = row.key();
                                                let key_for_expand = key.clone();
                                                let key_for_contrib = key.clone();
                                                let handle = RowHandle::of(&row);
                                                let handle_for_state = handle.clone();
                                                let handle_for_class = handle.clone();
                                                let handle_for_toggle = handle.clone();
                                                let is_expanded = expanded.get().contains(&key);
                                                let count = group.sub_rows.len();
                                                let gb_for_subrows = gb.clone();
                                                let now = chrono::Utc::now().timestamp();

                                                let header = view! {
                                                    <tr class="group-row">
                                                        <td class="select-col">
                                                            <input
                                                                type="checkbox"
                                                                prop:checked=move || matches!(selection.get().row_state(&handle_for_state), HeaderState::Selected)
                                                                class=move || match selection.get().row_state(&handle_for_class) {
                                                                    HeaderState::Partial => "group-checkbox partial",
                                                                    _ => "group-checkbox",
                                                                }
                                                                on:change=move |_| toggle_row(handle_for_toggle.clone())
                                                            />
                                                        </td>
                                                        <td class="name-cell group-head">
                                                            <button
                                                                class="expander"
                                                                on:click=move |_| set_expanded.update(|e| {
                                                                    if !e.remove(&key_for_expand) {
                                                                        e.insert(key_for_expand.clone());
                                                                    }
                                                                })
                                                            >
                                                                {if is_expanded { "\u{25be}" } else { "\u{25b8}" }}
                                                            </button>
                                                            {format!("{} alerts", count)}
                                                        </td>
                                                        <td>{row.cell(ColumnId::Severity).unwrap_or_default()}</td>
                                                        <td>{row.cell(ColumnId::Status).unwrap_or_default()}</td>
                                                        <td>{row.cell(ColumnId::Site).unwrap_or_default()}</td>
                                                        <td>{row.cell(ColumnId::Device).unwrap_or_default()}</td>
                                                        <td>{row.cell(ColumnId::Entity).unwrap_or_default()}</td>
                                                        <td>{row.cell(ColumnId::Source).unwrap_or_default()}</td>
                                                        <td></td>
                                                        <td></td>
                                                        <td class="actions-cell">
                                                            <button
                                                                class="btn btn-sm btn-secondary"
                                                                on:click=move |_| load_contributing.dispatch(key_for_contrib.clone())
                                                            >
                                                                "Contributing"
                                                            </button>
                                                        </td>
                                                    </tr>
                                                };

                                                if !is_expanded {
                                                    header.into_view()
                                                } else {
                                                    let sub_rows = group.sub_rows.iter().map(|record| {
                                                        let handle = RowHandle { key: record.id.clone(), leaf_ids: vec![record.id.clone()] };
                                                        let handle_for_toggle = handle.clone();
                                                        let record_for_detail = record.clone();
                                                        let cell = |column: ColumnId| {
                                                            leaf_cell_in_group(record, column, &gb_for_subrows).unwrap_or_default()
                                                        };
                                                        view! {
                                                            <tr class=format!("alert-row sub-row severity-{}", record.severity)>
                                                                <td class="select-col">
                                                                    <input
                                                                        type="checkbox"
                                                                        prop:checked=move || matches!(selection.get().row_state(&handle), HeaderState::Selected)
                                                                        on:change=move |_| toggle_row(handle_for_toggle.clone())
                                                                    />
                                                                </td>
                                                                <td class="name-cell">{cell(ColumnId::Name)}</td>
                                                                <td>{cell(ColumnId::Severity)}</td>
                                                                <td>{cell(ColumnId::Status)}</td>
                                                                <td>{cell(ColumnId::Site)}</td>
                                                                <td>{cell(ColumnId::Device)}</td>
                                                                <td>{cell(ColumnId::Entity)}</td>
                                                                <td>{cell(ColumnId::Source)}</td>
                                                                <td>{format_timestamp(record.start_time)}</td>
                                                                <td title=format_timestamp(record.last_active)>
                                                                    {format_age(now, record.last_active)}
                                                                </td>
                                                                <td class="actions-cell">
                                                                    <button
                                                                        class="btn btn-sm btn-secondary"
                                                                        on:click=move |_| set_detail.set(Some(record_for_detail.clone()))
                                                                    >
                                                                        "Details"
                                                                    </button>
                                                                </td>
                                                            </tr>
                                                        }
                                                    }).collect::<Vec<_>>();
                                                    view! { {header} {sub_rows} }.into_view()
                                                }
                                            }
                                        }
                                    }).collect::<Vec<_>>()
                                }}
                            </tbody>
                        </table>
                    </div>
                }.into_view()
            }}

            <div class="pagination">
                <button
                    class="pagination-btn"
                    disabled=move || !table_view.get().meta.can_prev
                    on:click=move |_| apply_pager(PagerAction::Prev)
                >
                    "Previous"
                </button>
                <span class="pagination-info">
                    {move || {
                        let derived = table_view.get();
                        if derived.meta.page_count == 0 {
                            "No pages".to_string()
                        } else {
                            format!(
                                "Page {} of {} ({} alerts)",
                                derived.page_index + 1,
                                derived.meta.page_count,
                                derived.filtered_leaves
                            )
                        }
                    }}
                </span>
                <button
                    class="pagination-btn"
                    disabled=move || !table_view.get().meta.can_next
                    on:click=move |_| apply_pager(PagerAction::Next)
                >
                    "Next"
                </button>
                <div class="page-size-selector">
                    <label>"Per page:"</label>
                    <select
                        class="page-size-select"
                        prop:value=move || page.get().size.as_usize().to_string()
                        on:change=move |ev| {
                            if let Some(size) = event_target_value(&ev).parse::<usize>().ok().and_then(PageSize::from_usize) {
                                apply_pager(PagerAction::SetSize(size));
                            }
                        }
                    >
                        {PageSize::ALL.into_iter().map(|size| {
                            let value = size.as_usize().to_string();
                            view! { <option value={value.clone()}>{value}</option> }
                        }).collect::<Vec<_>>()}
                    </select>
                </div>
            </div>

            // Suppress modal
            {move || if show_suppress_modal.get() {
                view! {
                    <div class="modal-overlay" on:click=move |_| set_show_suppress_modal.set(false)>
                        <div class="modal-content" on:click=|e| e.stop_propagation()>
                            <div class="modal-header">
                                <h2>"Suppress Alerts"</h2>
                                <button class="modal-close" on:click=move |_| set_show_suppress_modal.set(false)>"x"</button>
                            </div>
                            <div class="modal-body">
                                <p>{move || format!("Suppressing {} selected alerts", selection.get().len())}</p>
                                <div class="form-group">
                                    <label>"Duration"</label>
                                    <select
                                        prop:value=suppress_duration
                                        on:change=move |ev| set_suppress_duration.set(event_target_value(&ev))
                                    >
                                        <option value="1">"1 hour"</option>
                                        <option value="4">"4 hours"</option>
                                        <option value="24">"24 hours"</option>
                                        <option value="until_cleared">"Until cleared"</option>
                                    </select>
                                </div>
                                <div class="form-group">
                                    <label>"Reason"</label>
                                    <textarea
                                        prop:value=suppress_reason
                                        on:input=move |ev| set_suppress_reason.set(event_target_value(&ev))
                                        placeholder="Planned maintenance window"
                                        rows="3"
                                    ></textarea>
                                </div>
                            </div>
                            <div class="modal-footer">
                                <button class="btn btn-secondary" on:click=move |_| set_show_suppress_modal.set(false)>
                                    "Cancel"
                                </button>
                                <button
                                    class="btn btn-warning"
                                    on:click=confirm_suppress
                                    disabled=move || suppress_reason.get().is_empty()
                                >
                                    "Suppress"
                                </button>
                            </div>
                        </div>
                    </div>
                }.into_view()
            } else {
                view! { <div></div> }.into_view()
            }}

            // Alert detail modal
            {move || detail.get().map(|record| {
                let history = record.history.clone();
                view! {
                    <div class="modal-overlay" on:click=move |_| set_detail.set(None)>
                        <div class="modal-content" on:click=|e| e.stop_propagation()>
                            <div class="modal-header">
                                <h2>{record.name.clone()}</h2>
                                <button class="modal-close" on:click=move |_| set_detail.set(None)>"x"</button>
                            </div>
                            <div class="modal-body">
                                <div class="detail-grid">
                                    <div class="detail-item">
                                        <span class="detail-label">"Severity:"</span>
                                        <span class=severity_class(record.severity)>{record.severity.as_str()}</span>
                                    </div>
                                    <div class="detail-item">
                                        <span class="detail-label">"Status:"</span>
                                        <span class="detail-value">{record.status.as_str()}</span>
                                    </div>
                                    <div class="detail-item">
                                        <span class="detail-label">"Site:"</span>
                                        <span class="detail-value">{record.site.clone()}</span>
                                    </div>
                                    <div class="detail-item">
                                        <span class="detail-label">"Device:"</span>
                                        <span class="detail-value">{record.device.clone()}</span>
                                    </div>
                                    <div class="detail-item">
                                        <span class="detail-label">"Entity:"</span>
                                        <span class="detail-value">{record.entity.clone()}</span>
                                    </div>
                                    <div class="detail-item">
                                        <span class="detail-label">"Source:"</span>
                                        <span class="detail-value">{record.source.clone()}</span>
                                    </div>
                                    <div class="detail-item">
                                        <span class="detail-label">"Started:"</span>
                                        <span class="detail-value">{format_timestamp(record.start_time)}</span>
                                    </div>
                                    <div class="detail-item">
                                        <span class="detail-label">"Last active:"</span>
                                        <span class="detail-value">{format_timestamp(record.last_active)}</span>
                                    </div>
                                </div>
                                <h3>"History"</h3>
                                {if history.is_empty() {
                                    view! { <p class="no-data">"No history recorded"</p> }.into_view()
                                } else {
                                    view! {
                                        <ul class="history-list">
                                            {history.iter().map(|event| view! {
                                                <li>
                                                    <span class="history-time">{format_timestamp(event.timestamp)}</span>
                                                    <span class="history-event">{event.event.clone()}</span>
                                                </li>
                                            }).collect::<Vec<_>>()}
                                        </ul>
                                    }.into_view()
                                }}
                            </div>
                        </div>
                    </div>
                }
            })}

            // Contributing alerts modal for aggregate rows
            {move || contributing.get().map(|(aggregate_id, rows)| {
                view! {
                    <div class="modal-overlay" on:click=move |_| set_contributing.set(None)>
                        <div class="modal-content" on:click=|e| e.stop_propagation()>
                            <div class="modal-header">
                                <h2>"Contributing Alerts"</h2>
                                <button class="modal-close" on:click=move |_| set_contributing.set(None)>"x"</button>
                            </div>
                            <div class="modal-body">
                                <p class="hint">{aggregate_id}</p>
                                {if rows.is_empty() {
                                    view! { <p class="no-data">"No contributing alerts"</p> }.into_view()
                                } else {
                                    view! {
                                        <ul class="contributing-list">
                                            {rows.iter().map(|record| view! {
                                                <li>
                                                    <span class=severity_class(record.severity)>{record.severity.as_str()}</span>
                                                    " "
                                                    {record.name.clone()}
                                                    " on "
                                                    {record.device.clone()}
                                                </li>
                                            }).collect::<Vec<_>>()}
                                        </ul>
                                    }.into_view()
                                }}
                            </div>
                        </div>
                    </div>
                }
            })}
        </div>
    }
}
