use leptos::{html, *};

use crate::{
    host::window_primary_input_dom_id,
    model::WindowId,
    runtime_context::use_desktop_runtime,
    sessions::TranscriptEntry,
    shell::ShellLineKind,
};

/// Replaces the first word of `input` with `completion`, keeping any arguments.
fn apply_completion(input: &str, completion: &str) -> String {
    match input.trim_start().split_once(char::is_whitespace) {
        Some((_, rest)) => format!("{completion} {rest}"),
        None => format!("{completion} "),
    }
}

#[component]
pub(super) fn TerminalApp(window_id: WindowId) -> impl IntoView {
    let runtime = use_desktop_runtime();
    let input = create_rw_signal(String::new());
    let scroll_ref = create_node_ref::<html::Div>();

    let now_ms = runtime.now_ms();
    runtime.sessions.update(|sessions| {
        sessions.terminal_mut(window_id, now_ms);
    });

    let transcript = Signal::derive(move || {
        runtime.sessions.with(|sessions| {
            sessions
                .terminal(window_id)
                .map(|terminal| terminal.transcript().to_vec())
                .unwrap_or_default()
        })
    });
    let prompt = Signal::derive(move || {
        runtime.sessions.with(|sessions| {
            sessions
                .terminal(window_id)
                .map(|terminal| terminal.shell.prompt())
                .unwrap_or_default()
        })
    });

    create_effect(move |_| {
        let _ = transcript.with(Vec::len);
        if let Some(container) = scroll_ref.get() {
            container.set_scroll_top(container.scroll_height());
        }
    });

    let on_keydown = move |ev: web_sys::KeyboardEvent| match ev.key().as_str() {
        "Enter" => {
            ev.prevent_default();
            let line = input.get_untracked();
            input.set(String::new());
            runtime.run_terminal_command(window_id, &line);
        }
        "ArrowUp" | "ArrowDown" => {
            ev.prevent_default();
            let previous = ev.key() == "ArrowUp";
            let mut recalled = None;
            runtime.sessions.update(|sessions| {
                let terminal = sessions.terminal_mut(window_id, runtime.now_ms());
                recalled = if previous {
                    terminal.recall_previous()
                } else {
                    terminal.recall_next()
                };
            });
            if let Some(line) = recalled {
                input.set(line);
            }
        }
        "Tab" => {
            ev.prevent_default();
            let current = input.get_untracked();
            let first_word = current.split_whitespace().next().unwrap_or_default();
            let completion = runtime.sessions.with_untracked(|sessions| {
                sessions
                    .terminal(window_id)
                    .and_then(|terminal| terminal.shell.complete(first_word))
            });
            if let Some(completion) = completion {
                input.set(apply_completion(&current, completion));
            }
        }
        _ => {}
    };

    let input_id = window_primary_input_dom_id(window_id);
    let focus_input_id = input_id.clone();

    view! {
        <div
            class="terminal-content"
            node_ref=scroll_ref
            on:click=move |_| runtime.host.get_value().focus_window_input(window_id)
        >
            <For
                each=move || transcript.get().into_iter().enumerate()
                key=|(idx, entry)| (*idx, format!("{entry:?}"))
                let:item
            >
                {match item.1 {
                    TranscriptEntry::Command { prompt, line } => {
                        view! {
                            <div class="terminal-line command">
                                <span class="terminal-prompt">{prompt}</span>
                                " "
                                <span>{line}</span>
                            </div>
                        }
                    }
                    TranscriptEntry::Line(output) => {
                        let class_name = match output.kind {
                            ShellLineKind::Output => "terminal-line output",
                            ShellLineKind::Error => "terminal-line error",
                        };
                        view! { <div class=class_name>{output.text}</div> }
                    }
                }}
            </For>
            <div class="terminal-input-line">
                <label class="terminal-prompt" for=focus_input_id>{move || prompt.get()}</label>
                <input
                    id=input_id
                    class="terminal-input"
                    type="text"
                    autocomplete="off"
                    spellcheck="false"
                    prop:value=move || input.get()
                    on:input=move |ev| input.set(event_target_value(&ev))
                    on:keydown=on_keydown
                />
            </div>
        </div>
    }
}
