//! Calculator desktop app: a four-function keypad over a headless [`engine`].

pub mod engine;

use leptos::ev::KeyboardEvent;
use leptos::*;

pub use engine::{compute, format_number, BinaryOp, CalcAction, CalcError, CalculatorState};

#[derive(Clone, Copy)]
struct CalcKeySpec {
    id: &'static str,
    label: &'static str,
    class_name: &'static str,
    action: CalcAction,
}

const fn key(
    id: &'static str,
    label: &'static str,
    class_name: &'static str,
    action: CalcAction,
) -> CalcKeySpec {
    CalcKeySpec {
        id,
        label,
        class_name,
        action,
    }
}

const CALC_KEYS: [CalcKeySpec; 19] = [
    key("ac", "AC", "function", CalcAction::ClearAll),
    key("sign", "±", "function", CalcAction::ToggleSign),
    key("percent", "%", "function", CalcAction::Percent),
    key("divide", "÷", "operator", CalcAction::Binary(BinaryOp::Divide)),
    key("7", "7", "digit", CalcAction::Digit('7')),
    key("8", "8", "digit", CalcAction::Digit('8')),
    key("9", "9", "digit", CalcAction::Digit('9')),
    key("multiply", "×", "operator", CalcAction::Binary(BinaryOp::Multiply)),
    key("4", "4", "digit", CalcAction::Digit('4')),
    key("5", "5", "digit", CalcAction::Digit('5')),
    key("6", "6", "digit", CalcAction::Digit('6')),
    key("subtract", "−", "operator", CalcAction::Binary(BinaryOp::Subtract)),
    key("1", "1", "digit", CalcAction::Digit('1')),
    key("2", "2", "digit", CalcAction::Digit('2')),
    key("3", "3", "digit", CalcAction::Digit('3')),
    key("add", "+", "operator", CalcAction::Binary(BinaryOp::Add)),
    key("0", "0", "digit zero", CalcAction::Digit('0')),
    key("decimal", ".", "digit", CalcAction::Decimal),
    key("equals", "=", "operator", CalcAction::Equals),
];

#[component]
pub fn CalculatorApp() -> impl IntoView {
    let calc = create_rw_signal(CalculatorState::default());

    let on_keydown = move |ev: KeyboardEvent| {
        if ev.ctrl_key() || ev.meta_key() || ev.alt_key() {
            return;
        }

        if let Some(action) = engine::keyboard_action(&ev.key()) {
            ev.prevent_default();
            calc.update(|state| state.apply(action));
        }
    };

    view! {
        <div class="app-shell calculator-content" tabindex="0" on:keydown=on_keydown>
            <div
                class="calculator-display"
                role="status"
                aria-live="polite"
                data-error=move || if calc.get().is_error() { "true" } else { "false" }
            >
                {move || calc.get().display_text()}
            </div>

            <div class="calculator-buttons" role="group" aria-label="Calculator keys">
                <For each=move || CALC_KEYS.to_vec() key=|spec| spec.id let:spec>
                    <button
                        type="button"
                        class=move || {
                            let active = matches!(
                                spec.action,
                                CalcAction::Binary(op) if calc.get().pending_op() == Some(op)
                            );
                            format!(
                                "calculator-button {}{}",
                                spec.class_name,
                                if active { " active" } else { "" },
                            )
                        }
                        on:click=move |_| calc.update(|state| state.apply(spec.action))
                    >
                        <span>{spec.label}</span>
                    </button>
                </For>
            </div>
        </div>
    }
}
