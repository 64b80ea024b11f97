//! Static clinic facts: receptionist persona, doctor roster, open slots.
//!
//! Stand-ins for a real directory and calendar. Nothing here is consulted
//! from an external system.

use crate::models::Service;

pub const CLINIC_NAME: &str = "Noor Medical Clinic";
pub const RECEPTIONIST: &str = "Rachel";
pub const RECEPTIONIST_EXPERIENCE: &str = "5 years";
pub const RECEPTIONIST_BACKGROUND: &str = "nursing assistant before becoming a receptionist";
pub const FAVORITE_PART: &str =
    "connecting patients with the right doctor and seeing them leave feeling better";
pub const PERSONAL_TOUCH: &str = "I actually used to be afraid of dentists until I started working here and saw how gentle our team is!";
pub const HOBBIES: &str = "hiking with my dog Charlie, reading mystery novels, and trying new recipes";

pub const CLINIC_INFO: &str = "Noor Medical Clinic offers comprehensive care with specialists in dental, ENT, dermatology, and general medicine.";
pub const CLINIC_HOURS: &str =
    "Monday through Friday from 8:00 AM to 6:00 PM, and Saturday from 9:00 AM to 1:00 PM.";
pub const CLINIC_LOCATION: &str = "123 Healthcare Avenue, in the Westside Medical Plaza.";
pub const CLINIC_PARKING: &str = "free parking available in the garage next to our building, and we validate for up to 2 hours.";
pub const INSURANCE: &str = "We accept most major insurance plans including Blue Cross, Aetna, UnitedHealthcare, and Medicare.";
pub const CLINIC_PHONE: &str = "555-123-4567";

#[derive(Debug, PartialEq, Eq)]
pub struct Doctor {
    pub name: &'static str,
    pub specialty: &'static str,
    pub personality: &'static str,
    pub experience: &'static str,
    pub patients_say: &'static str,
    pub availability: &'static [&'static str],
    pub education: &'static str,
    pub languages: &'static [&'static str],
}

impl Doctor {
    /// "Dr. Sarah Chen" -> "Sarah"
    pub fn first_name(&self) -> &'static str {
        let mut words = self.name.split_whitespace();
        let title = words.next().unwrap_or(self.name);
        words.next().unwrap_or(title)
    }

    /// "Dr. Sarah Chen" -> "Chen"
    pub fn last_name(&self) -> &'static str {
        self.name.split_whitespace().last().unwrap_or(self.name)
    }

    /// "Monday and Wednesday"
    pub fn availability_phrase(&self) -> String {
        match self.availability {
            [] => "most weekdays".to_string(),
            [only] => only.to_string(),
            [first, second, ..] => format!("{first} and {second}"),
        }
    }
}

static DENTAL: [Doctor; 2] = [
    Doctor {
        name: "Dr. Sarah Chen",
        specialty: "cosmetic dentistry and preventative care",
        personality: "gentle and thorough",
        experience: "12 years",
        patients_say: "she takes time to explain procedures and has a very gentle touch",
        availability: &["Monday", "Wednesday", "Friday"],
        education: "University of Michigan Dental School",
        languages: &["English", "Mandarin"],
    },
    Doctor {
        name: "Dr. Michael Rodriguez",
        specialty: "orthodontics and pediatric dentistry",
        personality: "friendly and great with anxious patients",
        experience: "8 years",
        patients_say: "he makes even nervous patients feel at ease and explains everything clearly",
        availability: &["Tuesday", "Thursday", "Saturday morning"],
        education: "UCLA School of Dentistry",
        languages: &["English", "Spanish"],
    },
];

static ENT: [Doctor; 2] = [
    Doctor {
        name: "Dr. James Wilson",
        specialty: "sinus conditions and sleep apnea",
        personality: "attentive and straightforward",
        experience: "15 years",
        patients_say: "he's very knowledgeable and takes time to answer all questions",
        availability: &["Monday", "Tuesday", "Thursday"],
        education: "Johns Hopkins Medical School",
        languages: &["English"],
    },
    Doctor {
        name: "Dr. Reetu Patel",
        specialty: "hearing disorders and pediatric ENT",
        personality: "warm and patient-centered",
        experience: "10 years",
        patients_say: "she's amazing with children and really listens to patient concerns",
        availability: &["Wednesday", "Friday", "Saturday morning"],
        education: "Stanford Medical School",
        languages: &["English", "Hindi", "Gujarati"],
    },
];

static DERMATOLOGY: [Doctor; 2] = [
    Doctor {
        name: "Dr. Emily Johnson",
        specialty: "acne treatment and skin cancer screening",
        personality: "compassionate and detail-oriented",
        experience: "9 years",
        patients_say: "she's thorough in her examinations and explains treatment options clearly",
        availability: &["Monday", "Wednesday", "Friday"],
        education: "Harvard Medical School",
        languages: &["English"],
    },
    Doctor {
        name: "Dr. David Kim",
        specialty: "eczema, psoriasis, and cosmetic dermatology",
        personality: "knowledgeable and reassuring",
        experience: "14 years",
        patients_say:
            "he's excellent at diagnosing complex skin conditions and has a calming presence",
        availability: &["Tuesday", "Thursday", "Saturday morning"],
        education: "Columbia University College of Physicians and Surgeons",
        languages: &["English", "Korean"],
    },
];

static GENERAL: [Doctor; 2] = [
    Doctor {
        name: "Dr. Lisa Thompson",
        specialty: "preventative care and women's health",
        personality: "empathetic and thorough",
        experience: "18 years",
        patients_say: "she takes time to understand your overall health and lifestyle",
        availability: &["Monday", "Tuesday", "Thursday"],
        education: "Mayo Medical School",
        languages: &["English", "French"],
    },
    Doctor {
        name: "Dr. Robert Garcia",
        specialty: "chronic disease management and geriatric care",
        personality: "patient and comprehensive",
        experience: "20 years",
        patients_say: "he never rushes appointments and is excellent with elderly patients",
        availability: &["Wednesday", "Friday"],
        education: "University of Pennsylvania School of Medicine",
        languages: &["English", "Spanish"],
    },
];

pub fn doctors(service: Service) -> &'static [Doctor] {
    match service {
        Service::Dental => &DENTAL,
        Service::Ent => &ENT,
        Service::Dermatology => &DERMATOLOGY,
        Service::General => &GENERAL,
    }
}

/// Every doctor with their department, in department declaration order.
pub fn roster() -> impl Iterator<Item = (Service, &'static Doctor)> {
    Service::ALL
        .into_iter()
        .flat_map(|service| doctors(service).iter().map(move |d| (service, d)))
}

pub fn find_doctor(name: &str) -> Option<(Service, &'static Doctor)> {
    roster().find(|(_, d)| d.name == name)
}

pub fn open_slots(service: Service) -> &'static [&'static str] {
    match service {
        Service::Dental => &["Monday at 10:00 AM", "Tuesday at 2:30 PM", "Wednesday at 9:15 AM"],
        Service::Ent => &["Monday at 11:30 AM", "Wednesday at 3:00 PM", "Friday at 10:45 AM"],
        Service::Dermatology => &["Tuesday at 9:00 AM", "Thursday at 1:15 PM", "Friday at 4:30 PM"],
        Service::General => &["Monday at 8:30 AM", "Tuesday at 4:00 PM", "Thursday at 11:00 AM"],
    }
}

pub fn preparation_advice(service: Service) -> &'static str {
    match service {
        Service::Dental => "For your dental appointment, it's best to brush and floss before coming in, but avoid eating right before your visit. Do you have any specific concerns about your teeth or gums that we should note for the dentist?",
        Service::Ent => "For your ENT appointment, there's no special preparation needed. Just arrive about 10 minutes early to complete any paperwork. Is there a specific ear, nose, or throat issue you're experiencing that we should note for the doctor?",
        Service::Dermatology => "For your dermatology appointment, it's helpful to avoid wearing makeup if the issue is on your face. Also, make a note of when you first noticed the skin concern. Is there anything specific about your skin condition that we should tell the doctor in advance?",
        Service::General => "For your general checkup, it's good to fast for about 8 hours before if bloodwork might be needed. Wear comfortable clothing, and bring a list of any medications you're taking. Do you have any specific health concerns you'd like the doctor to address?",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_doctor_name_parts() {
        let doctor = &doctors(Service::Dental)[0];
        assert_eq!(doctor.first_name(), "Sarah");
        assert_eq!(doctor.last_name(), "Chen");
        assert_eq!(doctor.availability_phrase(), "Monday and Wednesday");
    }

    #[test]
    fn test_every_department_has_doctors_and_slots() {
        for service in Service::ALL {
            assert!(!doctors(service).is_empty());
            assert!(open_slots(service).len() >= 2);
        }
        assert_eq!(roster().count(), 8);
    }

    #[test]
    fn test_find_doctor() {
        let (service, doctor) = find_doctor("Dr. Reetu Patel").unwrap();
        assert_eq!(service, Service::Ent);
        assert_eq!(doctor.languages, &["English", "Hindi", "Gujarati"]);
        assert!(find_doctor("Dr. Nobody").is_none());
    }
}
