// src/services/access.rs

use chrono::{DateTime, Utc};

use crate::models::subscription::{
    Subscription, SubscriptionStatus, TrialInfo, ACTIVE_DAYS_LEFT, TRIAL_DAYS,
};

/// Calcula o estado de acesso do usuário: assinatura ativa, período de
/// teste em andamento ou acesso expirado (modo somente leitura).
///
/// Função pura — o chamador fornece o relógio. Nada aqui é cacheado:
/// o middleware recalcula a cada requisição.
pub fn compute_trial_info(
    now: DateTime<Utc>,
    created_at: Option<DateTime<Utc>>,
    subscription: Option<&Subscription>,
) -> TrialInfo {
    // Assinatura ativa e paga nunca expira o acesso
    if let Some(sub) = subscription {
        if sub.status == SubscriptionStatus::Active {
            return TrialInfo {
                days_left: ACTIVE_DAYS_LEFT,
                is_expired: false,
                has_full_access: true,
            };
        }
    }

    // Sem data de cadastro não há como ancorar o teste: sem acesso
    let Some(created_at) = created_at else {
        return TrialInfo {
            days_left: 0,
            is_expired: true,
            has_full_access: false,
        };
    };

    let days_since_registration = (now - created_at).num_days();

    // clamp superior: relógio adiantado no cadastro nunca rende mais que 7 dias
    let days_left = (TRIAL_DAYS - days_since_registration).clamp(0, TRIAL_DAYS);
    let is_expired = days_left == 0;

    TrialInfo {
        days_left,
        is_expired,
        has_full_access: !is_expired,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::subscription::PlanId;
    use chrono::{Duration, TimeZone};
    use uuid::Uuid;

    fn subscription_with_status(status: SubscriptionStatus) -> Subscription {
        Subscription {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            stripe_customer_id: Some("cus_123".to_string()),
            stripe_subscription_id: Some("sub_123".to_string()),
            plan_id: PlanId::Pro,
            status,
            trial_ends_at: None,
            current_period_start: None,
            current_period_end: None,
            cancel_at_period_end: false,
            created_at: None,
            updated_at: None,
        }
    }

    fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn trial_in_progress_has_full_access() {
        let registered = at(2026, 3, 1);
        for elapsed in 0..TRIAL_DAYS {
            let now = registered + Duration::days(elapsed);
            let info = compute_trial_info(now, Some(registered), None);
            assert_eq!(info.days_left, TRIAL_DAYS - elapsed);
            assert!(info.has_full_access);
            assert!(!info.is_expired);
        }
    }

    #[test]
    fn trial_expires_after_seven_days() {
        let registered = at(2026, 3, 1);
        let info = compute_trial_info(registered + Duration::days(7), Some(registered), None);
        assert_eq!(info.days_left, 0);
        assert!(info.is_expired);
        assert!(!info.has_full_access);

        // Bem depois do prazo continua expirado, nunca negativo
        let info = compute_trial_info(registered + Duration::days(400), Some(registered), None);
        assert_eq!(info.days_left, 0);
        assert!(info.is_expired);
    }

    #[test]
    fn partial_day_does_not_count_as_elapsed() {
        let registered = at(2026, 3, 1);
        // 6 dias e 23h: floor(6.96) = 6 dias corridos, resta 1
        let now = registered + Duration::days(6) + Duration::hours(23);
        let info = compute_trial_info(now, Some(registered), None);
        assert_eq!(info.days_left, 1);
        assert!(info.has_full_access);
    }

    #[test]
    fn active_subscription_overrides_trial() {
        let registered = at(2020, 1, 1); // há muito tempo
        let sub = subscription_with_status(SubscriptionStatus::Active);
        let info = compute_trial_info(at(2026, 3, 1), Some(registered), Some(&sub));
        assert!(info.has_full_access);
        assert!(!info.is_expired);
        assert_eq!(info.days_left, ACTIVE_DAYS_LEFT);
    }

    #[test]
    fn non_active_subscription_falls_back_to_trial_window() {
        let registered = at(2020, 1, 1);
        for status in [
            SubscriptionStatus::Trialing,
            SubscriptionStatus::PastDue,
            SubscriptionStatus::Canceled,
            SubscriptionStatus::Incomplete,
        ] {
            let sub = subscription_with_status(status);
            let info = compute_trial_info(at(2026, 3, 1), Some(registered), Some(&sub));
            assert!(!info.has_full_access, "status {status:?} não deveria liberar acesso");
        }
    }

    #[test]
    fn missing_registration_means_no_access() {
        let info = compute_trial_info(at(2026, 3, 1), None, None);
        assert_eq!(info.days_left, 0);
        assert!(info.is_expired);
        assert!(!info.has_full_access);
    }

    #[test]
    fn clock_skew_never_exceeds_seven_days() {
        // Cadastro "no futuro" (relógio adiantado): trava em 7, não em 7+skew
        let registered = at(2026, 3, 10);
        let info = compute_trial_info(at(2026, 3, 1), Some(registered), None);
        assert_eq!(info.days_left, TRIAL_DAYS);
        assert!(info.has_full_access);
    }
}
