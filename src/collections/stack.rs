//! LIFO 栈
//!
//! 深度优先路径搜索的显式栈，避免无界递归

/// 后进先出栈，push/pop 均摊 O(1)
#[derive(Debug, Clone, Default)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Stack<T> {
    /// 创建空栈
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// 压入元素
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// 弹出栈顶元素
    pub fn pop(&mut self) -> Option<T> {
        self.items.pop()
    }

    /// 查看栈顶元素
    pub fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    /// 元素个数
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stack_lifo_order() {
        let mut stack = Stack::new();
        stack.push(1);
        stack.push(2);
        stack.push(3);

        assert_eq!(stack.len(), 3);
        assert_eq!(stack.peek(), Some(&3));
        assert_eq!(stack.pop(), Some(3));
        assert_eq!(stack.pop(), Some(2));
        assert_eq!(stack.pop(), Some(1));
        assert_eq!(stack.pop(), None);
        assert!(stack.is_empty());
    }
}
