use crate::domain::esim::Plan;

fn plan(id: &str, name: &str, duration_days: u32, data_gb: u32, price_usd: u32, features: &[&str]) -> Plan {
    Plan {
        id: id.to_string(),
        name: name.to_string(),
        duration_days,
        data_gb,
        price_usd,
        features: features.iter().map(|f| f.to_string()).collect(),
    }
}

/// Fixed plan table used to validate activations.
pub fn builtin_plans() -> Vec<Plan> {
    vec![
        plan(
            "tourist-7d",
            "Tourist Plan",
            7,
            5,
            15,
            &["5GB High-Speed Data", "Nationwide Coverage", "Instant Activation"],
        ),
        plan(
            "business-30d",
            "Business Plan",
            30,
            20,
            35,
            &["20GB High-Speed Data", "Premium Network", "24/7 Support"],
        ),
        plan(
            "extended-90d",
            "Extended Stay",
            90,
            50,
            85,
            &["50GB High-Speed Data", "Renewable", "Best Value"],
        ),
    ]
}

pub fn find_plan(id: &str) -> Option<Plan> {
    builtin_plans().into_iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_plan_known_ids() {
        let plan = find_plan("business-30d").unwrap();
        assert_eq!(plan.duration_days, 30);
        assert_eq!(plan.data_gb, 20);
        assert!(find_plan("tourist-7d").is_some());
        assert!(find_plan("extended-90d").is_some());
    }

    #[test]
    fn test_find_plan_unknown_id() {
        assert!(find_plan("unlimited-365d").is_none());
    }
}
