//! Server-side handling of the public site's HTML forms.
//!
//! Actions answer with an [`ActionResult`] and HTTP 200 even when validation fails, the
//! page renders `message` either way.
use std::sync::Arc;

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
};
use serde::Deserialize;
use tracing::{error, info, warn};

use super::repo;
use crate::{
    models::{ActionResult, Contact, ContactInput},
    state::AppState,
    utils::{is_present, present},
};

pub const MISSING_FIELDS: &str = "Por favor completa todos los campos requeridos.";
pub const SENT: &str = "Mensaje enviado correctamente.";
pub const SEND_FAILED: &str =
    "Hubo un error al enviar el formulario. Por favor intenta de nuevo.";

/// Budget request form.
const QUOTE_FORM: &str = "presupuesto";
/// Job application form.
const CAREER_FORM: &str = "trabajo";

#[derive(Debug, Default, Deserialize)]
pub struct ContactForm {
    pub form_type: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub service: Option<String>,
    pub budget: Option<String>,
    pub phone: Option<String>,
    pub position: Option<String>,
    pub experience: Option<String>,
    pub portfolio: Option<String>,
}

fn with_note(message: &Option<String>, label: &str, note: &Option<String>) -> Option<String> {
    let message = present(message).unwrap_or_default();
    let note = present(note).unwrap_or_default();

    Some(format!("{message}\n\n{label}: {note}"))
}

/// Maps a submitted form onto a stored contact message.
pub fn contact_from_form(form: ContactForm) -> Result<Contact, &'static str> {
    if !is_present(&form.name) || !is_present(&form.email) || !is_present(&form.message) {
        return Err(MISSING_FIELDS);
    }

    let input = match present(&form.form_type) {
        Some(QUOTE_FORM) => {
            if !is_present(&form.service) || !is_present(&form.budget) {
                return Err(MISSING_FIELDS);
            }

            ContactInput {
                kind: Some("client".to_string()),
                message: with_note(&form.message, "Presupuesto", &form.budget),
                service: form.service,
                ..ContactInput::default()
            }
        }
        Some(CAREER_FORM) => {
            if !is_present(&form.phone)
                || !is_present(&form.position)
                || !is_present(&form.experience)
            {
                return Err(MISSING_FIELDS);
            }

            ContactInput {
                kind: Some("career".to_string()),
                message: with_note(&form.message, "Teléfono", &form.phone),
                position: form.position,
                experience: form.experience,
                portfolio: form.portfolio,
                ..ContactInput::default()
            }
        }
        _ => {
            if !is_present(&form.service) {
                return Err(MISSING_FIELDS);
            }

            ContactInput {
                kind: Some("client".to_string()),
                message: form.message,
                service: form.service,
                ..ContactInput::default()
            }
        }
    };

    Contact::submit(ContactInput {
        name: form.name,
        email: form.email,
        ..input
    })
    .map_err(|_| MISSING_FIELDS)
}

pub async fn contact_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<ContactForm>, FormRejection>,
) -> Json<ActionResult> {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!("Unreadable contact form: {rejection}");
            return Json(ActionResult::failure(MISSING_FIELDS));
        }
    };

    let contact = match contact_from_form(form) {
        Ok(contact) => contact,
        Err(message) => return Json(ActionResult::failure(message)),
    };

    if let Err(e) = repo::<Contact>(&state).save(&contact).await {
        error!("Error sending contact form: {e}");
        return Json(ActionResult::failure(SEND_FAILED));
    }

    info!("Contact form stored as {} message {}", contact.kind.as_str(), contact.id);

    Json(ActionResult::ok(SENT))
}
