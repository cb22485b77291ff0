use yew::prelude::*;
use web_sys::HtmlInputElement;


/// The checkout submit button.
#[derive(Properties, PartialEq)]
pub struct ButtonProps {
    /// Button label text
    pub label: String,
    /// Element id
    #[prop_or_default]
    pub id: Option<AttrValue>,
    /// Disable state
    #[prop_or_default]
    pub disabled: bool,
}

#[function_component(Button)]
pub fn button(props: &ButtonProps) -> Html {
    html! {
        <button
            type="submit"
            id={props.id.clone()}
            disabled={props.disabled}
            class="ygc-button"
        >
            { &props.label }
        </button>
    }
}

/// A controlled text input bound to a form field name.
#[derive(Properties, PartialEq)]
pub struct TextInputProps {
    /// Form field name, e.g. `full_name`
    pub name: AttrValue,
    /// Current value
    pub value: String,
    /// Emits `(name, value)` on each keystroke
    pub oninput: Callback<(AttrValue, String)>,
    /// Placeholder text
    #[prop_or_default]
    pub placeholder: AttrValue,
    #[prop_or_default]
    pub required: bool,
}

#[function_component(TextInput)]
pub fn text_input(props: &TextInputProps) -> Html {
    let oninput = props.oninput.clone();
    let name = props.name.clone();
    html! {
        <input
            type="text"
            class="stripe-style-input"
            name={props.name.clone()}
            value={props.value.clone()}
            placeholder={props.placeholder.clone()}
            required={props.required}
            oninput={Callback::from(move |e: InputEvent| {
                let input: HtmlInputElement = e.target_unchecked_into();
                oninput.emit((name.clone(), input.value()));
            })}
        />
    }
}

#[derive(Properties, PartialEq)]
pub struct CardErrorsProps {
    /// Element id the markup front-end looks the container up by
    #[prop_or(AttrValue::Static("card-errors"))]
    pub id: AttrValue,
    #[prop_or_default]
    pub message: Option<String>,
}

/// Inline card/confirmation error: an alert icon plus the message text.
#[function_component(CardErrors)]
pub fn card_errors(props: &CardErrorsProps) -> Html {
    html! {
        <div id={props.id.clone()} class="mb-3 text-danger" role="alert">
            if let Some(message) = &props.message {
                <span class="icon" role="alert"><i class="fas fa-times"></i></span>
                <span>{ message }</span>
            }
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct LoadingOverlayProps {
    #[prop_or(AttrValue::Static("loading-overlay"))]
    pub id: AttrValue,
    pub visible: bool,
}

/// Full-page spinner shown while a submission is in flight.
#[function_component(LoadingOverlay)]
pub fn loading_overlay(props: &LoadingOverlayProps) -> Html {
    if !props.visible {
        return Html::default();
    }
    html! {
        <div id={props.id.clone()} style="display:block;">
            <h1 class="text-light logo-font loading-spinner">
                <span class="icon"><i class="fas fa-3x fa-sync-alt fa-spin"></i></span>
            </h1>
        </div>
    }
}
