//! バインド解決
//!
//! 押下状態のサンプルごとに、成立しているバインドを求めて同時発火ポリシーで絞り込み、
//! 直前の有効集合との差分をアクションの有効化／無効化イベントとして返す。
//!
//! 一回の解決処理は同期的に完結する。内部でロックは取らないため、
//! 複数デバイスからの入力はホスト側で一本の列に直列化してから渡すこと。

use super::binding::{BindingSet, KeyBinding};
use super::combination::KeyCombination;
use super::concurrency::ConcurrencyMode;
use super::key::MouseButton;
use crate::config::ResolverConfig;

/// 解決処理が発行するイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingEvent<A> {
    /// バインドが有効になった
    Activated {
        /// バインド集合内の宣言位置
        binding: usize,
        action: A,
    },
    /// バインドが無効になった
    Deactivated { binding: usize, action: A },
}

impl<A> BindingEvent<A> {
    pub fn action(&self) -> &A {
        match self {
            BindingEvent::Activated { action, .. } | BindingEvent::Deactivated { action, .. } => action,
        }
    }

    pub fn binding(&self) -> usize {
        match self {
            BindingEvent::Activated { binding, .. } | BindingEvent::Deactivated { binding, .. } => {
                *binding
            }
        }
    }

    pub fn is_activation(&self) -> bool {
        matches!(self, BindingEvent::Activated { .. })
    }
}

/// アクション通知の受け手（ホスト側）
///
/// 戻り値は「処理済み」を表す。解決器はこれを解釈せず、`dispatch` の戻り値として
/// 集約するだけなので、伝播を止めるかどうかはホストが決める。
pub trait ActionHandler<A> {
    fn on_activated(&mut self, action: &A) -> bool;

    fn on_deactivated(&mut self, _action: &A) -> bool {
        false
    }
}

/// 入力コンテキストひとつ分のバインド解決器
#[derive(Debug, Clone)]
pub struct BindingResolver<A> {
    bindings: BindingSet<A>,
    mode: ConcurrencyMode,
    /// 有効なバインドの宣言位置（昇順）
    active: Vec<usize>,
    /// 直前の押下状態
    pressed: KeyCombination,
}

impl<A: Clone + PartialEq> BindingResolver<A> {
    /// 設定から作成（有効集合は空）
    pub fn new(config: ResolverConfig<A>) -> Self {
        Self::with_bindings(config.bindings, config.mode)
    }

    pub fn with_bindings(bindings: BindingSet<A>, mode: ConcurrencyMode) -> Self {
        Self {
            bindings,
            mode,
            active: Vec::new(),
            pressed: KeyCombination::empty(),
        }
    }

    pub fn mode(&self) -> ConcurrencyMode {
        self.mode
    }

    pub fn bindings(&self) -> &BindingSet<A> {
        &self.bindings
    }

    /// 直前に解決した押下状態
    pub fn pressed(&self) -> &KeyCombination {
        &self.pressed
    }

    /// 有効なバインド（宣言順）
    pub fn active_bindings(&self) -> impl Iterator<Item = &KeyBinding<A>> + '_ {
        self.active
            .iter()
            .filter_map(move |&index| self.bindings.get(index))
    }

    /// 有効なバインドのアクション（`All` モードでは重複し得る）
    pub fn active_actions(&self) -> impl Iterator<Item = &A> + '_ {
        self.active_bindings().map(|binding| &binding.action)
    }

    pub fn is_active(&self, action: &A) -> bool {
        self.active_actions().any(|a| a == action)
    }

    /// アクションを有効にしているバインド数
    pub fn active_count(&self, action: &A) -> usize {
        self.active_actions().filter(|a| *a == action).count()
    }

    /// 新しい押下状態で一回分の解決を行う
    ///
    /// 無効化イベントを先に、有効化イベントを後に並べて返す（それぞれ宣言順）。
    pub fn update(&mut self, pressed: &KeyCombination) -> Vec<BindingEvent<A>> {
        let selected = self.select(pressed);
        let mut events = Vec::new();

        for &index in &self.active {
            if !selected.contains(&index) {
                events.push(self.event(index, false));
            }
        }
        for &index in &selected {
            if !self.active.contains(&index) {
                events.push(self.event(index, true));
            }
        }

        self.active = selected;
        self.pressed = pressed.clone();
        events
    }

    /// 生のキーボードコードとマウスボタンから押下状態を作って解決する
    pub fn update_raw<K, M>(&mut self, keyboard_codes: K, mouse_buttons: M) -> Vec<BindingEvent<A>>
    where
        K: IntoIterator<Item = u16>,
        M: IntoIterator<Item = MouseButton>,
    {
        let pressed = KeyCombination::from_pressed(keyboard_codes, mouse_buttons);
        self.update(&pressed)
    }

    /// 解決してイベントをハンドラへ同期的に届ける
    ///
    /// いずれかのハンドラ呼び出しが処理済みを返したら `true`。
    pub fn dispatch<H>(&mut self, pressed: &KeyCombination, handler: &mut H) -> bool
    where
        H: ActionHandler<A> + ?Sized,
    {
        let mut handled = false;
        for event in self.update(pressed) {
            handled |= match &event {
                BindingEvent::Activated { action, .. } => handler.on_activated(action),
                BindingEvent::Deactivated { action, .. } => handler.on_deactivated(action),
            };
        }
        handled
    }

    /// 同時発火ポリシーを切り替え、直前の押下状態で再解決する
    pub fn set_mode(&mut self, mode: ConcurrencyMode) -> Vec<BindingEvent<A>> {
        self.mode = mode;
        let pressed = self.pressed.clone();
        self.update(&pressed)
    }

    /// バインド集合を差し替える（解決処理の合間にのみ呼ぶこと）
    ///
    /// 有効なバインドをすべて無効化してから差し替え、直前の押下状態で再解決する。
    pub fn set_bindings(&mut self, bindings: BindingSet<A>) -> Vec<BindingEvent<A>> {
        let mut events = self.deactivate_all();
        self.bindings = bindings;
        let pressed = self.pressed.clone();
        events.extend(self.update(&pressed));
        events
    }

    /// コンテキスト破棄時の後始末
    ///
    /// 空のコンビネーションのバインドが無効になるのはここと `set_bindings` だけ。
    pub fn release_all(&mut self) -> Vec<BindingEvent<A>> {
        self.pressed = KeyCombination::empty();
        self.deactivate_all()
    }

    fn deactivate_all(&mut self) -> Vec<BindingEvent<A>> {
        let active = std::mem::take(&mut self.active);
        active.into_iter().map(|index| self.event(index, false)).collect()
    }

    /// `index` は現在のバインド集合内の位置であること。
    /// `active` は常に現在の集合を指す（`set_bindings` は差し替え前に空にする）。
    fn event(&self, index: usize, activated: bool) -> BindingEvent<A> {
        debug_assert!(index < self.bindings.len(), "binding #{} out of range", index);
        let binding = &self.bindings.as_slice()[index];
        let action = binding.action.clone();
        if activated {
            log::debug!(
                "binding #{} activated by [{}]",
                index,
                binding.combination.to_readable_string()
            );
            BindingEvent::Activated {
                binding: index,
                action,
            }
        } else {
            log::debug!(
                "binding #{} deactivated ([{}])",
                index,
                binding.combination.to_readable_string()
            );
            BindingEvent::Deactivated {
                binding: index,
                action,
            }
        }
    }

    /// 成立したバインドをポリシーで絞り込み、宣言位置の昇順で返す
    fn select(&self, pressed: &KeyCombination) -> Vec<usize> {
        let candidates = self
            .bindings
            .iter()
            .enumerate()
            .filter(|(_, binding)| binding.combination.is_satisfied_by(pressed));

        match self.mode {
            ConcurrencyMode::All => candidates.map(|(index, _)| index).collect(),
            ConcurrencyMode::None => {
                // キー数が最大のものひとつ。同数なら先に宣言されたもの
                let mut best: Option<(usize, &KeyBinding<A>)> = None;
                for (index, binding) in candidates {
                    match best {
                        Some((_, current)) if current.combination.len() >= binding.combination.len() => {}
                        _ => best = Some((index, binding)),
                    }
                }
                best.map(|(index, _)| vec![index]).unwrap_or_default()
            }
            ConcurrencyMode::Unique => {
                // アクションごとに最も具体的なものひとつ。
                // 同数なら成立し続けている有効バインドを維持し、それ以外は先に宣言されたもの
                let mut winners: Vec<(usize, &KeyBinding<A>)> = Vec::new();
                for (index, binding) in candidates {
                    match winners.iter_mut().find(|slot| slot.1.action == binding.action) {
                        Some(slot) => {
                            let len = binding.combination.len();
                            let current = slot.1.combination.len();
                            let keeps_active = len == current
                                && self.active.contains(&index)
                                && !self.active.contains(&slot.0);
                            if len > current || keeps_active {
                                *slot = (index, binding);
                            }
                        }
                        None => winners.push((index, binding)),
                    }
                }
                let mut selected: Vec<usize> = winners.into_iter().map(|(index, _)| index).collect();
                selected.sort_unstable();
                selected
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::key::InputKey;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Act {
        One,
        Two,
        Three,
    }

    fn keys(keys: &[InputKey]) -> KeyCombination {
        KeyCombination::from(keys)
    }

    #[test]
    fn test_initial_state_is_empty() {
        let resolver = BindingResolver::with_bindings(
            BindingSet::new().bind([InputKey::A], Act::One),
            ConcurrencyMode::None,
        );
        assert_eq!(resolver.active_bindings().count(), 0);
        assert!(resolver.pressed().is_empty());
    }

    #[test]
    fn test_none_mode_prefers_most_specific() {
        let mut resolver = BindingResolver::with_bindings(
            BindingSet::new()
                .bind([InputKey::A], Act::One)
                .bind([InputKey::A, InputKey::LControl], Act::Two),
            ConcurrencyMode::None,
        );

        assert_eq!(
            resolver.update(&keys(&[InputKey::A])),
            vec![BindingEvent::Activated { binding: 0, action: Act::One }]
        );
        assert_eq!(
            resolver.update(&keys(&[InputKey::A, InputKey::LControl])),
            vec![
                BindingEvent::Deactivated { binding: 0, action: Act::One },
                BindingEvent::Activated { binding: 1, action: Act::Two },
            ]
        );
        assert!(!resolver.is_active(&Act::One));
        assert!(resolver.is_active(&Act::Two));
    }

    #[test]
    fn test_none_mode_tie_goes_to_first_declared() {
        let mut resolver = BindingResolver::with_bindings(
            BindingSet::new()
                .bind([InputKey::A, InputKey::B], Act::One)
                .bind([InputKey::B, InputKey::C], Act::Two),
            ConcurrencyMode::None,
        );
        let events = resolver.update(&keys(&[InputKey::A, InputKey::B, InputKey::C]));
        assert_eq!(events, vec![BindingEvent::Activated { binding: 0, action: Act::One }]);
    }

    #[test]
    fn test_unique_mode_allows_distinct_actions() {
        let mut resolver = BindingResolver::with_bindings(
            BindingSet::new()
                .bind([InputKey::A], Act::One)
                .bind([InputKey::LControl], Act::Two),
            ConcurrencyMode::Unique,
        );
        resolver.update(&keys(&[InputKey::A]));
        let events = resolver.update(&keys(&[InputKey::A, InputKey::LControl]));
        assert_eq!(events, vec![BindingEvent::Activated { binding: 1, action: Act::Two }]);
        assert!(resolver.is_active(&Act::One));
        assert!(resolver.is_active(&Act::Two));
    }

    #[test]
    fn test_unique_mode_one_binding_per_action() {
        let mut resolver = BindingResolver::with_bindings(
            BindingSet::new()
                .bind([InputKey::LControl], Act::Three)
                .bind([InputKey::LControl, InputKey::LShift], Act::Three),
            ConcurrencyMode::Unique,
        );
        resolver.update(&keys(&[InputKey::LControl]));
        let events = resolver.update(&keys(&[InputKey::LControl, InputKey::LShift]));
        assert_eq!(
            events,
            vec![
                BindingEvent::Deactivated { binding: 0, action: Act::Three },
                BindingEvent::Activated { binding: 1, action: Act::Three },
            ]
        );
        assert_eq!(resolver.active_count(&Act::Three), 1);
    }

    #[test]
    fn test_unique_mode_keeps_held_binding_on_equal_tie() {
        let mut resolver = BindingResolver::with_bindings(
            BindingSet::new()
                .bind([InputKey::A], Act::One)
                .bind([InputKey::B], Act::One),
            ConcurrencyMode::Unique,
        );
        assert_eq!(
            resolver.update(&keys(&[InputKey::B])),
            vec![BindingEvent::Activated { binding: 1, action: Act::One }]
        );
        assert!(resolver.update(&keys(&[InputKey::A, InputKey::B])).is_empty());
        assert_eq!(resolver.active_bindings().count(), 1);

        // B を離すと A のバインドへ移る
        assert_eq!(
            resolver.update(&keys(&[InputKey::A])),
            vec![
                BindingEvent::Deactivated { binding: 1, action: Act::One },
                BindingEvent::Activated { binding: 0, action: Act::One },
            ]
        );
    }

    #[test]
    fn test_unique_mode_longer_binding_still_takes_over() {
        let mut resolver = BindingResolver::with_bindings(
            BindingSet::new()
                .bind([InputKey::A, InputKey::LControl], Act::One)
                .bind([InputKey::B], Act::One),
            ConcurrencyMode::Unique,
        );
        resolver.update(&keys(&[InputKey::B]));
        assert_eq!(
            resolver.update(&keys(&[InputKey::A, InputKey::B, InputKey::LControl])),
            vec![
                BindingEvent::Deactivated { binding: 1, action: Act::One },
                BindingEvent::Activated { binding: 0, action: Act::One },
            ]
        );
    }

    #[test]
    fn test_all_mode_tracks_bindings_independently() {
        let mut resolver = BindingResolver::with_bindings(
            BindingSet::new()
                .bind([InputKey::LControl], Act::Three)
                .bind([InputKey::LControl, InputKey::LShift], Act::Three),
            ConcurrencyMode::All,
        );
        resolver.update(&keys(&[InputKey::LControl]));
        resolver.update(&keys(&[InputKey::LControl, InputKey::LShift]));
        assert_eq!(resolver.active_count(&Act::Three), 2);

        let events = resolver.update(&keys(&[InputKey::LControl]));
        assert_eq!(events, vec![BindingEvent::Deactivated { binding: 1, action: Act::Three }]);
        assert!(resolver.is_active(&Act::Three));
    }

    #[test]
    fn test_empty_combination_stays_active_until_release_all() {
        let mut resolver = BindingResolver::with_bindings(
            BindingSet::new().bind([], Act::One),
            ConcurrencyMode::All,
        );
        assert_eq!(
            resolver.update(&KeyCombination::empty()),
            vec![BindingEvent::Activated { binding: 0, action: Act::One }]
        );
        assert!(resolver.update(&keys(&[InputKey::Q])).is_empty());
        assert!(resolver.update(&KeyCombination::empty()).is_empty());
        assert_eq!(
            resolver.release_all(),
            vec![BindingEvent::Deactivated { binding: 0, action: Act::One }]
        );
    }

    #[test]
    fn test_set_mode_resolves_against_last_state() {
        let mut resolver = BindingResolver::with_bindings(
            BindingSet::new()
                .bind([InputKey::A], Act::One)
                .bind([InputKey::B], Act::Two),
            ConcurrencyMode::All,
        );
        resolver.update(&keys(&[InputKey::A, InputKey::B]));
        let events = resolver.set_mode(ConcurrencyMode::None);
        assert_eq!(events, vec![BindingEvent::Deactivated { binding: 1, action: Act::Two }]);
        assert_eq!(resolver.mode(), ConcurrencyMode::None);
    }

    #[test]
    fn test_set_bindings_swaps_configuration() {
        let mut resolver = BindingResolver::with_bindings(
            BindingSet::new().bind([InputKey::A], Act::One),
            ConcurrencyMode::None,
        );
        resolver.update(&keys(&[InputKey::A]));
        let events = resolver.set_bindings(BindingSet::new().bind([InputKey::A], Act::Two));
        assert_eq!(
            events,
            vec![
                BindingEvent::Deactivated { binding: 0, action: Act::One },
                BindingEvent::Activated { binding: 0, action: Act::Two },
            ]
        );
    }

    #[test]
    fn test_update_raw_ignores_unknown_codes() {
        let mut resolver = BindingResolver::with_bindings(
            BindingSet::new().bind([InputKey::MouseLeft, InputKey::LShift], Act::One),
            ConcurrencyMode::None,
        );
        let events = resolver.update_raw([InputKey::LShift.code(), 9999], [MouseButton::Left]);
        assert_eq!(events, vec![BindingEvent::Activated { binding: 0, action: Act::One }]);
    }

    struct Recorder {
        log: Vec<(bool, Act)>,
        consume: bool,
    }

    impl ActionHandler<Act> for Recorder {
        fn on_activated(&mut self, action: &Act) -> bool {
            self.log.push((true, *action));
            self.consume
        }

        fn on_deactivated(&mut self, action: &Act) -> bool {
            self.log.push((false, *action));
            false
        }
    }

    #[test]
    fn test_dispatch_delivers_in_order() {
        let mut resolver = BindingResolver::with_bindings(
            BindingSet::new()
                .bind([InputKey::A], Act::One)
                .bind([InputKey::A, InputKey::LControl], Act::Two),
            ConcurrencyMode::None,
        );
        let mut recorder = Recorder { log: Vec::new(), consume: true };

        assert!(resolver.dispatch(&keys(&[InputKey::A]), &mut recorder));
        assert!(resolver.dispatch(&keys(&[InputKey::A, InputKey::LControl]), &mut recorder));
        assert!(!resolver.dispatch(&KeyCombination::empty(), &mut recorder));
        assert_eq!(
            recorder.log,
            vec![(true, Act::One), (false, Act::One), (true, Act::Two), (false, Act::Two)]
        );
    }
}
