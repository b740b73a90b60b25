pub mod fetch_doctor_appointments;
