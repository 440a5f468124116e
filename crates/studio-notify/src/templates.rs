//! Message templates for booking flows

use studio_types::HallHireBooking;

use crate::mailer::EmailMessage;

/// Customer confirmation for a hall-hire submission
pub fn hall_hire_confirmation(booking: &HallHireBooking) -> EmailMessage {
    let text = format!(
        "Hi {name},\n\n\
         We've received your hall hire booking for {date} from {start} to {end}.\n\
         Total: \u{a3}{pounds}.{pence:02}\n\n\
         Your booking is pending confirmation; we'll be in touch shortly.\n",
        name = booking.customer_name,
        date = booking.event_date,
        start = booking.start_time.format("%H:%M"),
        end = booking.end_time.format("%H:%M"),
        pounds = booking.total_price_cents / 100,
        pence = booking.total_price_cents % 100,
    );

    EmailMessage {
        to: booking.customer_email.clone(),
        subject: format!("Hall hire booking received - {}", booking.event_date),
        text,
        html: None,
    }
}

/// Admin alert for a new hall-hire submission
pub fn hall_hire_admin_alert(booking: &HallHireBooking, admin_address: &str) -> EmailMessage {
    let text = format!(
        "New hall hire booking ({id}):\n\
         {name} <{email}> {phone}\n\
         {date} {start}-{end}, {attendees} attendees, {event_type}\n\
         Requirements: {reqs}\n",
        id = booking.id,
        name = booking.customer_name,
        email = booking.customer_email,
        phone = booking.customer_phone,
        date = booking.event_date,
        start = booking.start_time.format("%H:%M"),
        end = booking.end_time.format("%H:%M"),
        attendees = booking.expected_attendees,
        event_type = booking.event_type,
        reqs = booking.special_requirements.as_deref().unwrap_or("none"),
    );

    EmailMessage {
        to: admin_address.to_string(),
        subject: format!("New hall hire booking - {}", booking.event_date),
        text,
        html: None,
    }
}
