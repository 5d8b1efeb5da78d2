use leptos::*;

use crate::api;
use netwatch_common::Team;

/// Read-only listing of the teams alerts can be routed to
#[component]
pub fn TeamsPage() -> impl IntoView {
    let (teams, set_teams) = create_signal(Vec::<Team>::new());
    let (loading, set_loading) = create_signal(true);
    let (error, set_error) = create_signal(None::<String>);

    create_effect(move |_| {
        spawn_local(async move {
            set_loading.set(true);
            match api::list_teams().await {
                Ok(list) => {
                    set_teams.set(list);
                    set_error.set(None);
                }
                Err(e) => set_error.set(Some(format!("Failed to load teams: {}", e))),
            }
            set_loading.set(false);
        });
    });

    view! {
        <div class="teams-page">
            <h1>"Teams"</h1>

            {move || error.get().map(|msg| view! {
                <div class="alert alert-error">{msg}</div>
            })}

            {move || {
                if loading.get() {
                    view! { <p class="loading">"Loading teams..."</p> }.into_view()
                } else {
                    let team_list = teams.get();
                    if team_list.is_empty() {
                        view! { <p class="no-data">"No teams configured"</p> }.into_view()
                    } else {
                        view! {
                            <table class="teams-table">
                                <thead>
                                    <tr>
                                        <th>"Id"</th>
                                        <th>"Name"</th>
                                    </tr>
                                </thead>
                                <tbody>
                                    {team_list.into_iter().map(|team| view! {
                                        <tr>
                                            <td><code>{team.id}</code></td>
                                            <td>{team.name}</td>
                                        </tr>
                                    }).collect::<Vec<_>>()}
                                </tbody>
                            </table>
                        }.into_view()
                    }
                }
            }}
        </div>
    }
}
